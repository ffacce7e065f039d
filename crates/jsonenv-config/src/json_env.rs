//! Parse-and-expand orchestration for JSON-valued environment variables.
//!
//! Eligible variables (see [`is_eligible`]) are parsed as JSON and expanded
//! under the path derived from their name; `App__Servers=["a","b"]` becomes
//! `App:Servers:0 = a` and `App:Servers:1 = b`. The resulting map is
//! registered on a [`ConfigBuilder`] as an overlay, ranking above every
//! ordinary source.

use crate::builder::{ConfigBuilder, MemorySource};
use crate::document::JsonNode;
use crate::environment::{EnvSnapshot, is_eligible};
use crate::expand::expand_json;
use crate::overrides::OverrideMap;
use crate::path::ConfigPath;
use crate::ConfigError;
use log::{debug, info, warn};

/// Name of the overlay source added by this module.
pub const JSON_ENVIRONMENT_SOURCE: &str = "json-environment";

/// How malformed JSON in an eligible variable is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorMode {
    /// Fail the whole operation, naming the offending variable.
    #[default]
    Strict,
    /// Skip the offending variable and keep going.
    Lenient,
}

/// Expand every eligible variable in `snapshot` into a fresh override map.
///
/// Variables are processed in snapshot order (names compared ignoring ASCII
/// case), so when two variables produce the same path the one whose name
/// sorts later wins; a more specific name such as `P__A__B` therefore beats
/// a broader `p__a`.
pub fn expand_environment(
    snapshot: &EnvSnapshot,
    prefix: &str,
    mode: ParseErrorMode,
) -> Result<OverrideMap, ConfigError> {
    let mut overrides = OverrideMap::new();
    for entry in snapshot
        .iter()
        .filter(|entry| is_eligible(&entry.name, &entry.value, prefix))
    {
        let node = match JsonNode::parse(entry.value.trim_start()) {
            Ok(value) => value,
            Err(source) => match mode {
                ParseErrorMode::Strict => {
                    return Err(ConfigError::InvalidEnvironmentJson {
                        variable: entry.name.clone(),
                        source,
                    });
                }
                ParseErrorMode::Lenient => {
                    warn!(
                        "skipping environment variable with invalid JSON (name={}, error={})",
                        entry.name, source
                    );
                    continue;
                }
            },
        };
        let before = overrides.len();
        expand_json(&ConfigPath::from_env_name(&entry.name), &node, &mut overrides);
        debug!(
            "expanded JSON environment variable (name={}, new_entries={})",
            entry.name,
            overrides.len().saturating_sub(before)
        );
    }
    Ok(overrides)
}

/// Expand JSON environment variables from the process environment and
/// register them on `builder` as an overlay.
pub fn add_json_environment_overrides(
    builder: ConfigBuilder,
    prefix: &str,
    mode: ParseErrorMode,
) -> Result<ConfigBuilder, ConfigError> {
    add_json_environment_overrides_from(builder, &EnvSnapshot::capture(), prefix, mode)
}

/// Same as [`add_json_environment_overrides`] but reads from an explicit snapshot.
///
/// Nothing is added when no entries are produced.
pub fn add_json_environment_overrides_from(
    builder: ConfigBuilder,
    snapshot: &EnvSnapshot,
    prefix: &str,
    mode: ParseErrorMode,
) -> Result<ConfigBuilder, ConfigError> {
    let overrides = expand_environment(snapshot, prefix, mode)?;
    if overrides.is_empty() {
        debug!("no JSON environment overrides found (prefix={prefix})");
        return Ok(builder);
    }
    info!(
        "registering JSON environment overlay (prefix={}, entries={})",
        prefix,
        overrides.len()
    );
    Ok(builder.add_overlay(MemorySource::new(JSON_ENVIRONMENT_SOURCE, overrides)))
}

impl ConfigBuilder {
    /// Builder-style form of [`add_json_environment_overrides`].
    pub fn add_json_environment(
        self,
        prefix: &str,
        mode: ParseErrorMode,
    ) -> Result<Self, ConfigError> {
        add_json_environment_overrides(self, prefix, mode)
    }

    /// Builder-style form of [`add_json_environment_overrides_from`].
    pub fn add_json_environment_from(
        self,
        snapshot: &EnvSnapshot,
        prefix: &str,
        mode: ParseErrorMode,
    ) -> Result<Self, ConfigError> {
        add_json_environment_overrides_from(self, snapshot, prefix, mode)
    }
}
