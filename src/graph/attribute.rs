//! Attribute value types for graph elements

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attribute value supporting multiple data types
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Float (f64)
/// - Boolean
/// - Array (Vec<AttributeValue>)
/// - Map (HashMap<String, AttributeValue>)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<AttributeValue>),
    Map(HashMap<String, AttributeValue>),
    Null,
}

impl AttributeValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get array value if this is an array
    pub fn as_array(&self) -> Option<&Vec<AttributeValue>> {
        match self {
            AttributeValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get map value if this is a map
    pub fn as_map(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            AttributeValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "String",
            AttributeValue::Integer(_) => "Integer",
            AttributeValue::Float(_) => "Float",
            AttributeValue::Boolean(_) => "Boolean",
            AttributeValue::Array(_) => "Array",
            AttributeValue::Map(_) => "Map",
            AttributeValue::Null => "Null",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "\"{}\"", s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(fl) => write!(f, "{}", fl),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            AttributeValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            AttributeValue::Null => write!(f, "null"),
        }
    }
}

// Convenience conversions
impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(arr: Vec<AttributeValue>) -> Self {
        AttributeValue::Array(arr)
    }
}

impl From<HashMap<String, AttributeValue>> for AttributeValue {
    fn from(map: HashMap<String, AttributeValue>) -> Self {
        AttributeValue::Map(map)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttributeValue::Null,
            serde_json::Value::Bool(b) => AttributeValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Integer(i),
                None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => AttributeValue::String(s),
            serde_json::Value::Array(items) => {
                AttributeValue::Array(items.into_iter().map(AttributeValue::from).collect())
            }
            serde_json::Value::Object(map) => AttributeValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, AttributeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Null => serde_json::Value::Null,
            AttributeValue::Boolean(b) => serde_json::Value::Bool(b),
            AttributeValue::Integer(i) => serde_json::Value::Number(i.into()),
            AttributeValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttributeValue::String(s) => serde_json::Value::String(s),
            AttributeValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            AttributeValue::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Attribute map for storing node and edge attributes
pub type AttributeMap = HashMap<String, AttributeValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_types() {
        assert_eq!(
            AttributeValue::String("test".to_string()).type_name(),
            "String"
        );
        assert_eq!(AttributeValue::Integer(42).type_name(), "Integer");
        assert_eq!(AttributeValue::Float(3.14).type_name(), "Float");
        assert_eq!(AttributeValue::Boolean(true).type_name(), "Boolean");
        assert_eq!(AttributeValue::Array(vec![]).type_name(), "Array");
        assert_eq!(AttributeValue::Map(HashMap::new()).type_name(), "Map");
        assert_eq!(AttributeValue::Null.type_name(), "Null");
    }

    #[test]
    fn test_attribute_value_conversions() {
        let string_attr: AttributeValue = "hello".into();
        assert_eq!(string_attr.as_string(), Some("hello"));

        let int_attr: AttributeValue = 42i64.into();
        assert_eq!(int_attr.as_integer(), Some(42));

        let float_attr: AttributeValue = 3.14.into();
        assert_eq!(float_attr.as_float(), Some(3.14));

        let bool_attr: AttributeValue = true.into();
        assert_eq!(bool_attr.as_boolean(), Some(true));
    }

    #[test]
    fn test_attribute_map() {
        let mut attrs = AttributeMap::new();
        attrs.insert("name".to_string(), "Alice".into());
        attrs.insert("age".to_string(), 30i64.into());
        attrs.insert("active".to_string(), true.into());

        assert_eq!(attrs.get("name").unwrap().as_string(), Some("Alice"));
        assert_eq!(attrs.get("age").unwrap().as_integer(), Some(30));
        assert_eq!(attrs.get("active").unwrap().as_boolean(), Some(true));
    }

    #[test]
    fn test_nested_attributes() {
        let arr = vec![
            AttributeValue::Integer(1),
            AttributeValue::Integer(2),
            AttributeValue::Integer(3),
        ];
        let arr_attr = AttributeValue::Array(arr);
        assert_eq!(arr_attr.as_array().unwrap().len(), 3);

        let mut map = HashMap::new();
        map.insert(
            "key".to_string(),
            AttributeValue::String("value".to_string()),
        );
        let map_attr = AttributeValue::Map(map);
        assert!(map_attr.as_map().unwrap().contains_key("key"));
    }

    #[test]
    fn test_json_round_trip() {
        let json: serde_json::Value = serde_json::json!({
            "name": "Alice",
            "age": 30,
            "score": 95.5,
            "tags": ["a", "b"],
            "extra": null
        });

        let value = AttributeValue::from(json.clone());
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name").unwrap().as_string(), Some("Alice"));
        assert_eq!(map.get("age").unwrap().as_integer(), Some(30));
        assert_eq!(map.get("score").unwrap().as_float(), Some(95.5));
        assert_eq!(map.get("tags").unwrap().as_array().unwrap().len(), 2);
        assert!(map.get("extra").unwrap().is_null());

        let back: serde_json::Value = value.into();
        assert_eq!(back, json);
    }
}
