//! Parsed JSON documents that keep number literals verbatim.
//!
//! `serde_json::Value` normalizes numbers (`1E5` turns into `1e+5`), so
//! environment values are parsed into [`JsonNode`] instead, walking
//! [`RawValue`] slices so every number keeps its source text.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use serde_json::value::RawValue;
use std::fmt;

/// A parsed JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonNode {
    /// Members in document order; duplicate names are kept.
    Object(Vec<(String, JsonNode)>),
    Array(Vec<JsonNode>),
    String(String),
    /// The number exactly as written.
    Number(String),
    Bool(bool),
    Null,
}

impl JsonNode {
    /// Parse JSON text, keeping number literals as written.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let raw: Box<RawValue> = serde_json::from_str(text)?;
        Self::from_raw(&raw)
    }

    fn from_raw(raw: &RawValue) -> Result<Self, serde_json::Error> {
        let text = raw.get().trim();
        let node = match text.as_bytes().first() {
            Some(b'{') => {
                let RawMembers(members) = serde_json::from_str(text)?;
                let members = members
                    .into_iter()
                    .map(|(name, member)| Ok((name, Self::from_raw(&member)?)))
                    .collect::<Result<Vec<_>, serde_json::Error>>()?;
                JsonNode::Object(members)
            }
            Some(b'[') => {
                let elements: Vec<Box<RawValue>> = serde_json::from_str(text)?;
                let elements = elements
                    .iter()
                    .map(|element| Self::from_raw(element))
                    .collect::<Result<Vec<_>, _>>()?;
                JsonNode::Array(elements)
            }
            Some(b'"') => JsonNode::String(serde_json::from_str(text)?),
            Some(b't' | b'f') => JsonNode::Bool(serde_json::from_str(text)?),
            Some(b'n') => JsonNode::Null,
            _ => JsonNode::Number(text.to_string()),
        };
        Ok(node)
    }
}

impl From<&Value> for JsonNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(members) => JsonNode::Object(
                members
                    .iter()
                    .map(|(name, member)| (name.clone(), JsonNode::from(member)))
                    .collect(),
            ),
            Value::Array(elements) => {
                JsonNode::Array(elements.iter().map(JsonNode::from).collect())
            }
            Value::String(text) => JsonNode::String(text.clone()),
            Value::Number(number) => JsonNode::Number(number.to_string()),
            Value::Bool(flag) => JsonNode::Bool(*flag),
            Value::Null => JsonNode::Null,
        }
    }
}

/// Object members as unparsed slices, in document order.
struct RawMembers(Vec<(String, Box<RawValue>)>);

impl<'de> Deserialize<'de> for RawMembers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = RawMembers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawMembers, A::Error> {
                let mut members = Vec::new();
                while let Some(entry) = map.next_entry::<String, Box<RawValue>>()? {
                    members.push(entry);
                }
                Ok(RawMembers(members))
            }
        }

        deserializer.deserialize_map(MembersVisitor)
    }
}
