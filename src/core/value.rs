use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::value_path::{PathSegment, ValuePath};

/// A parsed document node. Object entries keep their insertion order, which
/// is also their display order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Object(_))
    }

    /// Containers with nothing to disclose render as plain literals.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Object(entries) => entries.is_empty(),
            _ => false,
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Object(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Follows `path` down from this node.
    pub fn at_path(&self, path: &ValuePath) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (current, segment) {
                (Value::Object(entries), PathSegment::Key(key)) => entries.get(key.as_str())?,
                (Value::List(items), PathSegment::Index(index)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => serializer.serialize_f64(*number),
            Self::Text(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a structured value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_bool<E: de::Error>(self, flag: bool) -> Result<Value, E> {
                Ok(Value::Bool(flag))
            }

            fn visit_i64<E: de::Error>(self, number: i64) -> Result<Value, E> {
                Ok(Value::Number(number as f64))
            }

            fn visit_u64<E: de::Error>(self, number: u64) -> Result<Value, E> {
                Ok(Value::Number(number as f64))
            }

            fn visit_f64<E: de::Error>(self, number: f64) -> Result<Value, E> {
                Ok(Value::Number(number))
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Value, E> {
                Ok(Value::Text(text.to_string()))
            }

            fn visit_string<E: de::Error>(self, text: String) -> Result<Value, E> {
                Ok(Value::Text(text))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Value::List(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    entries.insert(key, value);
                }
                Ok(Value::Object(entries))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::core::value_path::ValuePath;

    #[test]
    fn object_keys_keep_insertion_order() {
        let parsed: Value =
            serde_json::from_str(r#"{"zeta":1,"alpha":2,"mid":3}"#).expect("valid json");
        let Value::Object(entries) = &parsed else {
            panic!("expected an object");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn round_trip_preserves_structure() {
        let source = r#"{"name":"demo","count":3,"tags":["a","b"],"nested":{"ok":true,"gap":null}}"#;
        let parsed: Value = serde_json::from_str(source).expect("valid json");
        let text = serde_json::to_string(&parsed).expect("serializable");
        let reparsed: Value = serde_json::from_str(&text).expect("round trip");
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn at_path_follows_keys_and_indexes() {
        let parsed: Value =
            serde_json::from_str(r#"{"rows":[{"id":7},{"id":9}]}"#).expect("valid json");
        let path = ValuePath::root().child_key("rows").child_index(1).child_key("id");
        assert_eq!(parsed.at_path(&path), Some(&Value::Number(9.0)));

        let missing = ValuePath::root().child_key("rows").child_index(5);
        assert_eq!(parsed.at_path(&missing), None);
    }
}
