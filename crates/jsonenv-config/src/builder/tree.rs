//! Rebuild JSON trees from flat configuration entries.

use crate::overrides::OverrideMap;
use log::debug;
use serde_json::{Map, Value};

/// Convert flat entries back into a JSON tree.
///
/// Leaves become strings (or `null`). Objects whose keys are exactly
/// `0..n` become arrays. When a path is both a leaf and a parent, the
/// parent wins.
pub(super) fn entries_to_json(entries: &OverrideMap) -> Value {
    let mut root = Map::new();
    for (path, value) in entries.iter() {
        let leaf = value.map_or(Value::Null, |text| Value::String(text.to_string()));
        insert_at_path(&mut root, path.segments(), leaf);
    }
    numeric_objects_to_arrays(Value::Object(root))
}

fn insert_at_path(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let key = existing_key(map, head).unwrap_or_else(|| head.clone());

    if rest.is_empty() {
        if matches!(map.get(&key), Some(Value::Object(_))) {
            debug!("dropping leaf shadowed by nested entries (key={key})");
        } else {
            map.insert(key, value);
        }
        return;
    }

    let slot = map
        .entry(key.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        debug!("replacing leaf with nested entries (key={key})");
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(child) = slot {
        insert_at_path(child, rest, value);
    }
}

/// Find the stored spelling of `segment` among sibling keys, ignoring case.
fn existing_key(map: &Map<String, Value>, segment: &str) -> Option<String> {
    map.keys()
        .find(|key| key.eq_ignore_ascii_case(segment))
        .cloned()
}

fn numeric_objects_to_arrays(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let processed: Map<String, Value> = map
                .into_iter()
                .map(|(key, child)| (key, numeric_objects_to_arrays(child)))
                .collect();
            if is_dense_index_map(&processed) {
                let mut indexed = processed
                    .into_iter()
                    .filter_map(|(key, child)| key.parse::<usize>().ok().map(|i| (i, child)))
                    .collect::<Vec<_>>();
                indexed.sort_by_key(|(index, _)| *index);
                Value::Array(indexed.into_iter().map(|(_, child)| child).collect())
            } else {
                Value::Object(processed)
            }
        }
        other => other,
    }
}

/// True when the keys are exactly the canonical indices `0..len`.
fn is_dense_index_map(map: &Map<String, Value>) -> bool {
    if map.is_empty() {
        return false;
    }
    let mut seen = vec![false; map.len()];
    for key in map.keys() {
        match key.parse::<usize>() {
            Ok(index) if index < seen.len() && index.to_string() == *key => seen[index] = true,
            _ => return false,
        }
    }
    seen.into_iter().all(|present| present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ConfigPath;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entries(pairs: &[(&str, Option<&str>)]) -> OverrideMap {
        pairs
            .iter()
            .map(|(key, value)| (ConfigPath::parse(key), value.map(str::to_string)))
            .collect()
    }

    #[test]
    fn rebuilds_objects_and_arrays() {
        let map = entries(&[
            ("App:Hosts:0", Some("a")),
            ("App:Hosts:1", Some("b")),
            ("App:Name", Some("svc")),
            ("App:Proxy", None),
        ]);
        assert_eq!(
            entries_to_json(&map),
            json!({ "App": { "Hosts": ["a", "b"], "Name": "svc", "Proxy": null } })
        );
    }

    #[test]
    fn sparse_indices_stay_objects() {
        let map = entries(&[("List:0", Some("a")), ("List:2", Some("c"))]);
        assert_eq!(entries_to_json(&map), json!({ "List": { "0": "a", "2": "c" } }));
    }

    #[test]
    fn non_canonical_indices_stay_objects() {
        let map = entries(&[("List:00", Some("a"))]);
        assert_eq!(entries_to_json(&map), json!({ "List": { "00": "a" } }));
    }

    #[test]
    fn parent_entries_shadow_leaves() {
        let map = entries(&[("A", Some("leaf")), ("A:B", Some("nested"))]);
        assert_eq!(entries_to_json(&map), json!({ "A": { "B": "nested" } }));
    }

    #[test]
    fn siblings_merge_ignoring_case() {
        let map = entries(&[("App:X", Some("1")), ("app:Y", Some("2"))]);
        assert_eq!(entries_to_json(&map), json!({ "App": { "X": "1", "Y": "2" } }));
    }
}
