//! Environment snapshots and the JSON eligibility filter.

use crate::path::{SEPARATOR, normalize_env_name};
use log::debug;
use std::cmp::Ordering;

/// A single environment variable captured from the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: String,
    pub value: String,
}

/// Immutable, name-sorted snapshot of environment variables.
///
/// Entries are ordered by their ASCII-case-folded names, with byte order as
/// the tiebreak, so expansion order (and therefore the winner of overlapping
/// paths) matches the case-insensitive path ordering and does not depend on
/// how the platform enumerates the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    entries: Vec<EnvEntry>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Entries whose name or value is not valid UTF-8 are skipped.
    pub fn capture() -> Self {
        let mut skipped = 0usize;
        let entries = std::env::vars_os()
            .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                _ => {
                    skipped += 1;
                    None
                }
            })
            .collect::<Vec<_>>();
        if skipped > 0 {
            debug!("skipped non-UTF-8 environment entries (count={skipped})");
        }
        Self::from_pairs(entries)
    }

    /// Build a snapshot from explicit name/value pairs.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut entries = pairs
            .into_iter()
            .map(|(name, value)| EnvEntry {
                name: name.into(),
                value: value.into(),
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            folded_cmp(&a.name, &b.name).then_with(|| a.name.cmp(&b.name))
        });
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn folded_cmp(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|byte| byte.to_ascii_lowercase())
        .cmp(b.bytes().map(|byte| byte.to_ascii_lowercase()))
}

/// Normalize a user-supplied prefix: `__` becomes `:` and trailing
/// separators are dropped, so `App`, `App__` and `App:` are equivalent.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    normalize_env_name(prefix)
        .trim_end_matches(SEPARATOR)
        .to_string()
}

/// Strip `<prefix>:` from a normalized name, ignoring ASCII case.
pub(crate) fn strip_normalized_prefix<'a>(normalized: &'a str, prefix: &str) -> Option<&'a str> {
    let head = normalized.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    normalized[prefix.len()..].strip_prefix(SEPARATOR)
}

/// True when `value` looks like a JSON object or array.
pub fn looks_like_json_container(value: &str) -> bool {
    matches!(value.trim_start().chars().next(), Some('{' | '['))
}

/// Decide whether an environment variable should be expanded as JSON.
///
/// The name must start with `prefix` followed by the hierarchy separator,
/// and the value must begin with `{` or `[` after leading whitespace. Only
/// ASCII letters match case-insensitively; `ÄPP` does not match `äpp`.
pub fn is_eligible(name: &str, value: &str, prefix: &str) -> bool {
    if name.is_empty() || !looks_like_json_container(value) {
        return false;
    }
    let normalized = normalize_env_name(name);
    strip_normalized_prefix(&normalized, &normalize_prefix(prefix)).is_some()
}
