//! Inclusion predicate algebra
//!
//! A [`Predicate`] decides whether a graph element belongs in a view.
//! Predicates are pure: evaluation reads the element through the graph
//! surface and has no side effects, so the same tree can be shared by any
//! number of views and re-evaluated at any time.
//!
//! `and`/`or` short-circuit left to right. `xor` is true iff exactly one
//! operand is true and therefore evaluates every operand: a later true
//! operand can flip the result back to false.

use regex::Regex;

use crate::graph::attribute::AttributeValue;
use crate::graph::types::ElementKind;
use crate::graph::GraphBase;

/// Boolean inclusion rule over graph elements, composable as a tree.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Always false
    None,
    /// Always true
    All,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// True iff exactly one operand is true
    Xor(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Element has the attribute; with a value, the attribute must equal it
    HasAttribute {
        key: String,
        value: Option<AttributeValue>,
    },
    /// Element identifier matches the pattern for its kind
    IdMatches {
        node: Option<Regex>,
        edge: Option<Regex>,
    },
    /// True only for edges whose endpoints both satisfy the operand
    BothEndpoints(Box<Predicate>),
}

impl Predicate {
    pub fn none() -> Self {
        Predicate::None
    }

    pub fn all() -> Self {
        Predicate::All
    }

    pub fn and(operands: Vec<Predicate>) -> Self {
        Predicate::And(operands)
    }

    pub fn or(operands: Vec<Predicate>) -> Self {
        Predicate::Or(operands)
    }

    pub fn xor(operands: Vec<Predicate>) -> Self {
        Predicate::Xor(operands)
    }

    pub fn not(operand: Predicate) -> Self {
        Predicate::Not(Box::new(operand))
    }

    /// Element has `key` with exactly the given value
    pub fn attribute_equals(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Predicate::HasAttribute {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Element has `key`, whatever its value
    pub fn has_attribute(key: impl Into<String>) -> Self {
        Predicate::HasAttribute {
            key: key.into(),
            value: None,
        }
    }

    /// Identifier matches the pattern, for nodes and edges alike.
    ///
    /// Patterns match the whole identifier, as if anchored on both sides.
    pub fn id_matches(pattern: &str) -> Result<Self, regex::Error> {
        let regex = anchored(pattern)?;
        Ok(Predicate::IdMatches {
            node: Some(regex.clone()),
            edge: Some(regex),
        })
    }

    /// Identifier matches with distinct patterns per kind; a missing
    /// pattern rejects that kind.
    pub fn id_matches_split(
        node_pattern: Option<&str>,
        edge_pattern: Option<&str>,
    ) -> Result<Self, regex::Error> {
        Ok(Predicate::IdMatches {
            node: node_pattern.map(anchored).transpose()?,
            edge: edge_pattern.map(anchored).transpose()?,
        })
    }

    pub fn both_endpoints(operand: Predicate) -> Self {
        Predicate::BothEndpoints(Box::new(operand))
    }

    /// Evaluate against the element `(kind, id)` as found in `graph`.
    pub fn eval(&self, kind: ElementKind, id: &str, graph: &dyn GraphBase) -> bool {
        match self {
            Predicate::None => false,
            Predicate::All => true,
            Predicate::And(operands) => operands.iter().all(|p| p.eval(kind, id, graph)),
            Predicate::Or(operands) => operands.iter().any(|p| p.eval(kind, id, graph)),
            Predicate::Xor(operands) => {
                operands.iter().filter(|p| p.eval(kind, id, graph)).count() == 1
            }
            Predicate::Not(operand) => !operand.eval(kind, id, graph),
            Predicate::HasAttribute { key, value } => {
                let found = match kind {
                    ElementKind::Node => graph.node_attribute(id, key),
                    ElementKind::Edge => graph.edge_attribute(id, key),
                };
                match (found, value) {
                    (Some(actual), Some(expected)) => &actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            }
            Predicate::IdMatches { node, edge } => {
                let pattern = match kind {
                    ElementKind::Node => node,
                    ElementKind::Edge => edge,
                };
                pattern.as_ref().is_some_and(|regex| regex.is_match(id))
            }
            Predicate::BothEndpoints(operand) => match kind {
                ElementKind::Edge => graph.edge_endpoints(id).is_some_and(|endpoints| {
                    operand.eval(ElementKind::Node, endpoints.from.as_str(), graph)
                        && operand.eval(ElementKind::Node, endpoints.to.as_str(), graph)
                }),
                ElementKind::Node => false,
            },
        }
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    fn sample_graph() -> GraphStore {
        let store = GraphStore::new("g");
        store.add_node("A").unwrap();
        store.add_node("B").unwrap();
        store
            .set_node_attribute("A", "type", AttributeValue::from("X"))
            .unwrap();
        store
            .set_node_attribute("B", "type", AttributeValue::from("Y"))
            .unwrap();
        store.add_edge("AB", "A", "B", true).unwrap();
        store
            .set_edge_attribute("AB", "weight", AttributeValue::from(3i64))
            .unwrap();
        store
    }

    #[test]
    fn test_constants() {
        let g = sample_graph();
        assert!(!Predicate::none().eval(ElementKind::Node, "A", &g));
        assert!(Predicate::all().eval(ElementKind::Node, "A", &g));
        assert!(Predicate::all().eval(ElementKind::Node, "missing", &g));
    }

    #[test]
    fn test_attribute_equals() {
        let g = sample_graph();
        let p = Predicate::attribute_equals("type", "X");

        assert!(p.eval(ElementKind::Node, "A", &g));
        assert!(!p.eval(ElementKind::Node, "B", &g));
        assert!(!p.eval(ElementKind::Node, "missing", &g));
        // node pattern does not look at edge attributes
        assert!(!p.eval(ElementKind::Edge, "AB", &g));
    }

    #[test]
    fn test_has_attribute() {
        let g = sample_graph();
        let p = Predicate::has_attribute("type");

        assert!(p.eval(ElementKind::Node, "A", &g));
        assert!(p.eval(ElementKind::Node, "B", &g));
        assert!(Predicate::has_attribute("weight").eval(ElementKind::Edge, "AB", &g));
        assert!(!Predicate::has_attribute("weight").eval(ElementKind::Node, "A", &g));
    }

    #[test]
    fn test_boolean_composition() {
        let g = sample_graph();
        let x = Predicate::attribute_equals("type", "X");
        let y = Predicate::attribute_equals("type", "Y");

        assert!(Predicate::and(vec![Predicate::all(), x.clone()]).eval(ElementKind::Node, "A", &g));
        assert!(!Predicate::and(vec![x.clone(), y.clone()]).eval(ElementKind::Node, "A", &g));
        assert!(Predicate::or(vec![y.clone(), x.clone()]).eval(ElementKind::Node, "A", &g));
        assert!(!Predicate::or(vec![]).eval(ElementKind::Node, "A", &g));
        assert!(Predicate::not(y).eval(ElementKind::Node, "A", &g));
    }

    #[test]
    fn test_xor_exactly_one() {
        let g = sample_graph();
        let t = Predicate::all;
        let f = Predicate::none;

        assert!(Predicate::xor(vec![t(), f()]).eval(ElementKind::Node, "A", &g));
        assert!(Predicate::xor(vec![f(), t()]).eval(ElementKind::Node, "A", &g));
        // two true operands flip the result back to false
        assert!(!Predicate::xor(vec![t(), t()]).eval(ElementKind::Node, "A", &g));
        assert!(!Predicate::xor(vec![t(), t(), t()]).eval(ElementKind::Node, "A", &g));
        assert!(!Predicate::xor(vec![f(), f()]).eval(ElementKind::Node, "A", &g));
    }

    #[test]
    fn test_id_matches_is_anchored() {
        let g = sample_graph();
        let p = Predicate::id_matches("A").unwrap();

        assert!(p.eval(ElementKind::Node, "A", &g));
        // whole-identifier match, not substring
        assert!(!p.eval(ElementKind::Edge, "AB", &g));

        let p = Predicate::id_matches("A.*").unwrap();
        assert!(p.eval(ElementKind::Node, "A", &g));
        assert!(p.eval(ElementKind::Edge, "AB", &g));
    }

    #[test]
    fn test_id_matches_split_patterns() {
        let g = sample_graph();
        let p = Predicate::id_matches_split(Some("[AB]"), None).unwrap();

        assert!(p.eval(ElementKind::Node, "A", &g));
        assert!(p.eval(ElementKind::Node, "B", &g));
        // no edge pattern rejects every edge
        assert!(!p.eval(ElementKind::Edge, "AB", &g));
    }

    #[test]
    fn test_both_endpoints() {
        let g = sample_graph();
        let has_type = Predicate::has_attribute("type");
        let p = Predicate::both_endpoints(has_type);

        assert!(p.eval(ElementKind::Edge, "AB", &g));
        // never true for nodes
        assert!(!p.eval(ElementKind::Node, "A", &g));

        let x_only = Predicate::both_endpoints(Predicate::attribute_equals("type", "X"));
        assert!(!x_only.eval(ElementKind::Edge, "AB", &g));
    }
}
