//! JSON5 file sources.

use super::ConfigSource;
use crate::expand::flatten_json;
use crate::overrides::OverrideMap;
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config directory under the home directory.
const DEFAULT_CONFIG_DIR: &str = ".jsonenv";
/// Default config filename.
const DEFAULT_CONFIG_FILE: &str = "jsonenv.json5";

/// A JSON5 document flattened into configuration entries.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
    optional: bool,
}

impl JsonFileSource {
    /// A file that must exist.
    pub fn required(path: impl AsRef<Path>) -> Self {
        Self::with_optional(path.as_ref(), false)
    }

    /// A file that is treated as empty when missing.
    pub fn optional(path: impl AsRef<Path>) -> Self {
        Self::with_optional(path.as_ref(), true)
    }

    fn with_optional(path: &Path, optional: bool) -> Self {
        Self {
            name: format!("file({})", path.display()),
            path: path.to_path_buf(),
            optional,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<OverrideMap, ConfigError> {
        if self.optional && !self.path.exists() {
            debug!("optional config file missing (path={})", self.path.display());
            return Ok(OverrideMap::new());
        }
        debug!("loading config file (path={})", self.path.display());
        let contents = fs::read_to_string(&self.path)?;
        let value: Value = json5::from_str(&contents)?;
        if !(value.is_object() || value.is_array()) {
            return Err(ConfigError::InvalidFileRoot {
                path: self.path.clone(),
            });
        }
        Ok(flatten_json(&value))
    }
}

/// Default user config path under the home directory.
pub fn default_user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE)
    })
}
