//! Flat path-keyed configuration entries.

use crate::path::ConfigPath;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Mapping from logical path to a string value or an explicit null.
///
/// Keys are case-insensitive. Writing an existing key replaces both the value
/// and the stored spelling of the key. Iteration follows case-insensitive
/// path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: BTreeMap<ConfigPath, Option<String>>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value (or `None` for an explicit null), replacing any prior write.
    pub fn insert(&mut self, path: ConfigPath, value: Option<String>) {
        // Remove first so the key spelling follows the latest write.
        self.entries.remove(&path);
        self.entries.insert(path, value);
    }

    /// Look up an entry; `Some(None)` means the path is present with a null value.
    pub fn get(&self, path: &ConfigPath) -> Option<Option<&str>> {
        self.entries.get(path).map(Option::as_deref)
    }

    pub fn contains_key(&self, path: &ConfigPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigPath, Option<&str>)> {
        self.entries.iter().map(|(path, value)| (path, value.as_deref()))
    }

    /// Merge another map on top of this one; entries from `other` win.
    pub fn extend(&mut self, other: OverrideMap) {
        for (path, value) in other.entries {
            self.insert(path, value);
        }
    }
}

impl IntoIterator for OverrideMap {
    type Item = (ConfigPath, Option<String>);
    type IntoIter = btree_map::IntoIter<ConfigPath, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(ConfigPath, Option<String>)> for OverrideMap {
    fn from_iter<T: IntoIterator<Item = (ConfigPath, Option<String>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (path, value) in iter {
            map.insert(path, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_write_wins_and_updates_spelling() {
        let mut map = OverrideMap::new();
        map.insert(ConfigPath::parse("app:key"), Some("one".to_string()));
        map.insert(ConfigPath::parse("APP:KEY"), Some("two".to_string()));

        assert_eq!(map.len(), 1);
        let (path, value) = map.iter().next().expect("entry");
        assert_eq!(path.to_string(), "APP:KEY");
        assert_eq!(value, Some("two"));
    }

    #[test]
    fn null_is_distinct_from_missing() {
        let mut map = OverrideMap::new();
        map.insert(ConfigPath::parse("a"), None);

        assert_eq!(map.get(&ConfigPath::parse("a")), Some(None));
        assert_eq!(map.get(&ConfigPath::parse("b")), None);
    }

    #[test]
    fn extend_prefers_incoming_entries() {
        let mut base: OverrideMap = [
            (ConfigPath::parse("a"), Some("base".to_string())),
            (ConfigPath::parse("b"), Some("kept".to_string())),
        ]
        .into_iter()
        .collect();
        let overlay: OverrideMap = [(ConfigPath::parse("A"), None)].into_iter().collect();

        base.extend(overlay);
        assert_eq!(base.get(&ConfigPath::parse("a")), Some(None));
        assert_eq!(base.get(&ConfigPath::parse("b")), Some(Some("kept")));
    }
}
