//! Recursive expansion of JSON values into flat configuration entries.

use crate::document::JsonNode;
use crate::overrides::OverrideMap;
use crate::path::ConfigPath;
use serde_json::Value;

/// Walk `node` and write one entry per leaf under `path`.
///
/// Objects recurse per member, arrays per zero-based index. Numbers keep
/// their literal text (`1.50` stays `1.50`, `1E5` stays `1E5`) and null is
/// recorded as an explicit `None`. Empty containers produce no entries.
pub fn expand_json(path: &ConfigPath, node: &JsonNode, out: &mut OverrideMap) {
    match node {
        JsonNode::Object(members) => {
            for (name, member) in members {
                expand_json(&path.child(name.as_str()), member, out);
            }
        }
        JsonNode::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                expand_json(&path.index(index), element, out);
            }
        }
        JsonNode::String(text) | JsonNode::Number(text) => {
            out.insert(path.clone(), Some(text.clone()))
        }
        JsonNode::Bool(flag) => out.insert(path.clone(), Some(flag.to_string())),
        JsonNode::Null => out.insert(path.clone(), None),
    }
}

/// Expand a whole document from the root path.
pub fn flatten_json(value: &Value) -> OverrideMap {
    let mut out = OverrideMap::new();
    expand_json(&ConfigPath::root(), &JsonNode::from(value), &mut out);
    out
}
