//! Layered configuration builder.
//!
//! Sources are grouped into two tiers. Ordinary sources are merged in the
//! order they were added; overlay sources are merged afterwards, so an
//! overlay always beats an ordinary source even when the ordinary source was
//! added later.

mod file_source;
mod sources;
mod tree;

#[cfg(test)]
mod tests;

pub use file_source::{JsonFileSource, default_user_config_path};
pub use sources::{EnvironmentSource, MemorySource};

use crate::overrides::OverrideMap;
use crate::path::ConfigPath;
use crate::ConfigError;
use log::{debug, info};
use serde_json::Value;
use std::fmt;

/// A provider of flat configuration entries.
pub trait ConfigSource: Send + Sync {
    /// Human-readable name used in logs and layer listings.
    fn name(&self) -> &str;

    /// Load this source's entries.
    fn load(&self) -> Result<OverrideMap, ConfigError>;
}

/// Precedence band of a source within the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceTier {
    /// Regular sources, merged in insertion order.
    Ordinary,
    /// Highest-precedence sources, merged after every ordinary source.
    Overlay,
}

/// Metadata about one registered source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub name: String,
    pub tier: SourceTier,
}

/// Collects sources and merges them into a [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    ordinary: Vec<Box<dyn ConfigSource>>,
    overlays: Vec<Box<dyn ConfigSource>>,
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("sources", &self.sources())
            .finish()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ordinary source. Later ordinary sources win over earlier ones.
    pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
        debug!("adding config source (name={})", source.name());
        self.ordinary.push(Box::new(source));
        self
    }

    /// Add an overlay source that ranks above every ordinary source.
    pub fn add_overlay(mut self, source: impl ConfigSource + 'static) -> Self {
        debug!("adding overlay source (name={})", source.name());
        self.overlays.push(Box::new(source));
        self
    }

    /// Registered sources from lowest to highest precedence.
    pub fn sources(&self) -> Vec<ConfigLayer> {
        self.ordered()
            .map(|(tier, source)| ConfigLayer {
                name: source.name().to_string(),
                tier,
            })
            .collect()
    }

    /// Load and merge all sources.
    pub fn build(&self) -> Result<Config, ConfigError> {
        let mut entries = OverrideMap::new();
        for (tier, source) in self.ordered() {
            let loaded = source.load()?;
            debug!(
                "loaded config source (name={}, tier={:?}, entries={})",
                source.name(),
                tier,
                loaded.len()
            );
            entries.extend(loaded);
        }
        let layers = self.sources();
        info!(
            "configuration built (layers={}, entries={})",
            layers.len(),
            entries.len()
        );
        Ok(Config { entries, layers })
    }

    fn ordered(&self) -> impl Iterator<Item = (SourceTier, &dyn ConfigSource)> {
        self.ordinary
            .iter()
            .map(|source| (SourceTier::Ordinary, source.as_ref()))
            .chain(
                self.overlays
                    .iter()
                    .map(|source| (SourceTier::Overlay, source.as_ref())),
            )
    }
}

/// Merged, read-only configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    entries: OverrideMap,
    layers: Vec<ConfigLayer>,
}

impl Config {
    /// Value at `key`; explicit nulls read as `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_entry(key).flatten()
    }

    /// Entry at `key`; `Some(None)` means the key is present with a null value.
    pub fn get_entry(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(&ConfigPath::parse(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&ConfigPath::parse(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigPath, Option<&str>)> {
        self.entries.iter()
    }

    /// Layers that contributed to this config, lowest precedence first.
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Entries below `prefix`, with keys made relative to it.
    pub fn section(&self, prefix: &str) -> Config {
        let prefix = ConfigPath::parse(prefix);
        let entries = self
            .entries
            .iter()
            .filter_map(|(path, value)| {
                let relative = path.strip_prefix(&prefix)?;
                (!relative.is_root()).then(|| (relative, value.map(str::to_string)))
            })
            .collect();
        Config {
            entries,
            layers: self.layers.clone(),
        }
    }

    /// Distinct immediate child segments below `prefix`.
    pub fn child_keys(&self, prefix: &str) -> Vec<String> {
        let prefix = ConfigPath::parse(prefix);
        let mut children: Vec<String> = Vec::new();
        for (path, _) in self.entries.iter() {
            let Some(relative) = path.strip_prefix(&prefix) else {
                continue;
            };
            let Some(first) = relative.segments().first() else {
                continue;
            };
            if !children.iter().any(|known| known.eq_ignore_ascii_case(first)) {
                children.push(first.clone());
            }
        }
        children
    }

    /// Rebuild a JSON tree from the flat entries.
    pub fn to_json(&self) -> Value {
        tree::entries_to_json(&self.entries)
    }

    /// Consume the config, returning its flat entries.
    pub fn into_entries(self) -> OverrideMap {
        self.entries
    }
}
