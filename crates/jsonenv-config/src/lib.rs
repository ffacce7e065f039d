//! JSON environment overrides and layered configuration.
//!
//! This crate expands JSON objects and arrays stored in environment
//! variables into hierarchical key/value entries and layers them over other
//! configuration sources with the highest precedence.
//!
//! ```no_run
//! use jsonenv_config::{ConfigBuilder, JsonFileSource, ParseErrorMode};
//!
//! // With `App__Servers='["a","b"]'` set, `App:Servers:0` reads "a".
//! let config = ConfigBuilder::new()
//!     .add_source(JsonFileSource::optional("app.json5"))
//!     .add_json_environment("App", ParseErrorMode::Strict)?
//!     .build()?;
//! let first = config.get("App:Servers:0");
//! # Ok::<(), jsonenv_config::ConfigError>(())
//! ```

mod builder;
mod document;
mod environment;
mod error;
mod expand;
mod extension;
mod json_env;
mod overrides;
mod path;

/// Public error type returned by loading and expansion APIs.
pub use error::ConfigError;
/// Builder, sources, and the merged config view.
pub use builder::{
    Config, ConfigBuilder, ConfigLayer, ConfigSource, EnvironmentSource, JsonFileSource,
    MemorySource, SourceTier, default_user_config_path,
};
pub use document::JsonNode;
pub use environment::{EnvEntry, EnvSnapshot, is_eligible, looks_like_json_container};
pub use expand::{expand_json, flatten_json};
/// Explicit extension registry.
pub use extension::{
    ConfigExtension, ExtensionDescriptor, ExtensionFactory, ExtensionRegistry,
    JsonEnvironmentExtension,
};
pub use json_env::{
    JSON_ENVIRONMENT_SOURCE, ParseErrorMode, add_json_environment_overrides,
    add_json_environment_overrides_from, expand_environment,
};
pub use overrides::OverrideMap;
pub use path::{ConfigPath, ENV_SEPARATOR, SEPARATOR, normalize_env_name};
