//! Logical configuration paths.
//!
//! A `ConfigPath` is an ordered list of segments (property names or array
//! indices). Paths render as segments joined by [`SEPARATOR`] and compare,
//! order, and hash without regard to ASCII case while keeping the original
//! spelling for display.
//!
//! Case folding covers ASCII letters only. `Ä` and `ä` are different
//! segments, as are `ǅ` and `ǆ`; no Unicode case mapping is applied.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Hierarchy separator used when rendering paths.
pub const SEPARATOR: &str = ":";
/// Token that marks hierarchy boundaries in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// Hierarchical configuration path, compared ignoring ASCII case.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    /// The empty (root) path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a rendered path such as `App:Servers:0`.
    ///
    /// The empty string parses to the root path.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::root();
        }
        Self {
            segments: raw.split(SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// Derive a path from an environment variable name by treating every
    /// `__` as a hierarchy boundary.
    ///
    /// Empty segments are dropped: `P__` maps to `P` and `P____X` to `P:X`.
    pub fn from_env_name(name: &str) -> Self {
        Self {
            segments: normalize_env_name(name)
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Build a path from explicit segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Return a new path with a property segment appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Return a new path with an array index segment appended.
    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &ConfigPath) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Strip an ancestor path, returning the remainder relative to it.
    pub fn strip_prefix(&self, prefix: &ConfigPath) -> Option<ConfigPath> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }

    fn folded_segments(&self) -> impl Iterator<Item = String> + '_ {
        self.segments.iter().map(|s| s.to_ascii_lowercase())
    }
}

/// Replace every `__` in an environment variable name with `:`.
pub fn normalize_env_name(name: &str) -> String {
    name.replace(ENV_SEPARATOR, SEPARATOR)
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

impl From<&str> for ConfigPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ConfigPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl PartialEq for ConfigPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for ConfigPath {}

impl Hash for ConfigPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.segments.len());
        for segment in self.folded_segments() {
            segment.hash(state);
        }
    }
}

impl Ord for ConfigPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded_segments().cmp(other.folded_segments())
    }
}

impl PartialOrd for ConfigPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
