//! In-memory and scalar environment sources.

use super::ConfigSource;
use crate::environment::{EnvSnapshot, normalize_prefix, strip_normalized_prefix};
use crate::overrides::OverrideMap;
use crate::path::{ConfigPath, normalize_env_name};
use crate::ConfigError;

/// A fixed set of entries.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    entries: OverrideMap,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, entries: OverrideMap) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Build a source from `(key, value)` string pairs.
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| (ConfigPath::parse(key.as_ref()), Some(value.into())))
            .collect();
        Self::new(name, entries)
    }
}

impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<OverrideMap, ConfigError> {
        Ok(self.entries.clone())
    }
}

/// Plain scalar environment variables.
///
/// Names are split on `__`. With a prefix, only matching variables are
/// loaded and the prefix is removed from their keys; values are stored as-is,
/// including JSON text, which is handled separately by the JSON overlay.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    prefix: Option<String>,
    snapshot: Option<EnvSnapshot>,
}

impl EnvironmentSource {
    /// Load every environment variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load only variables named `<prefix>__...`, with the prefix removed.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            snapshot: None,
        }
    }

    /// Read from a fixed snapshot instead of the process environment.
    pub fn snapshot(mut self, snapshot: EnvSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

impl ConfigSource for EnvironmentSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn load(&self) -> Result<OverrideMap, ConfigError> {
        let captured;
        let snapshot = match &self.snapshot {
            Some(snapshot) => snapshot,
            None => {
                captured = EnvSnapshot::capture();
                &captured
            }
        };
        let prefix = self.prefix.as_deref().map(normalize_prefix);

        let mut entries = OverrideMap::new();
        for entry in snapshot.iter() {
            let normalized = normalize_env_name(&entry.name);
            let key = match prefix.as_deref() {
                Some(prefix) => match strip_normalized_prefix(&normalized, prefix) {
                    Some(rest) => rest,
                    None => continue,
                },
                None => normalized.as_str(),
            };
            let path = ConfigPath::from_env_name(key);
            if path.is_root() {
                continue;
            }
            entries.insert(path, Some(entry.value.clone()));
        }
        Ok(entries)
    }
}
