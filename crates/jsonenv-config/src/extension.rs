//! Registry of named configuration extensions.
//!
//! Host applications register extensions at startup; each one receives the
//! builder and returns it augmented. Extensions are applied in registration
//! order and share the same builder without isolation.

use crate::builder::ConfigBuilder;
use crate::environment::EnvSnapshot;
use crate::json_env::{
    ParseErrorMode, add_json_environment_overrides, add_json_environment_overrides_from,
};
use crate::ConfigError;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

/// Something that can augment a configuration builder.
pub trait ConfigExtension: Send + Sync {
    fn apply(&self, builder: ConfigBuilder) -> Result<ConfigBuilder, ConfigError>;
}

/// Name and description attached to a registered extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    pub name: String,
    pub description: String,
}

impl ExtensionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Factory producing a fresh extension instance.
pub type ExtensionFactory = Arc<dyn Fn() -> Box<dyn ConfigExtension> + Send + Sync>;

struct RegisteredExtension {
    descriptor: ExtensionDescriptor,
    factory: ExtensionFactory,
}

/// In-memory registry for configuration extensions.
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    /// Registered extensions in registration order.
    extensions: Arc<RwLock<Vec<RegisteredExtension>>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension factory under `descriptor.name`.
    ///
    /// Re-registering a name replaces the entry in place.
    pub fn register<F, E>(&self, descriptor: ExtensionDescriptor, factory: F)
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: ConfigExtension + 'static,
    {
        debug!("registering config extension (name={})", descriptor.name);
        let factory: ExtensionFactory =
            Arc::new(move || Box::new(factory()) as Box<dyn ConfigExtension>);
        let mut extensions = self.extensions.write();
        match extensions
            .iter_mut()
            .find(|entry| entry.descriptor.name == descriptor.name)
        {
            Some(existing) => {
                existing.descriptor = descriptor;
                existing.factory = factory;
            }
            None => extensions.push(RegisteredExtension {
                descriptor,
                factory,
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.extensions
            .read()
            .iter()
            .any(|entry| entry.descriptor.name == name)
    }

    /// Descriptors of all registered extensions, in registration order.
    pub fn descriptors(&self) -> Vec<ExtensionDescriptor> {
        self.extensions
            .read()
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Instantiate and apply a single extension by name.
    pub fn apply(&self, name: &str, builder: ConfigBuilder) -> Result<ConfigBuilder, ConfigError> {
        let factory = self
            .extensions
            .read()
            .iter()
            .find(|entry| entry.descriptor.name == name)
            .map(|entry| Arc::clone(&entry.factory))
            .ok_or_else(|| ConfigError::UnknownExtension(name.to_string()))?;
        debug!("applying config extension (name={name})");
        factory().apply(builder)
    }

    /// Instantiate and apply every registered extension in registration order.
    pub fn apply_all(&self, builder: ConfigBuilder) -> Result<ConfigBuilder, ConfigError> {
        // Snapshot so extensions may touch the registry while running.
        let registered = self
            .extensions
            .read()
            .iter()
            .map(|entry| (entry.descriptor.name.clone(), Arc::clone(&entry.factory)))
            .collect::<Vec<_>>();

        let mut builder = builder;
        for (name, factory) in registered {
            debug!("applying config extension (name={name})");
            builder = factory().apply(builder)?;
        }
        Ok(builder)
    }
}

/// Extension that adds the JSON environment overlay.
///
/// Reads the process environment when applied, unless a snapshot was
/// supplied with [`JsonEnvironmentExtension::with_snapshot`].
#[derive(Debug, Clone)]
pub struct JsonEnvironmentExtension {
    pub prefix: String,
    pub mode: ParseErrorMode,
    pub snapshot: Option<EnvSnapshot>,
}

impl JsonEnvironmentExtension {
    pub const NAME: &'static str = "json-environment";
    pub const DESCRIPTION: &'static str =
        "Expands JSON objects and arrays in prefixed environment variables";

    pub fn new(prefix: impl Into<String>, mode: ParseErrorMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
            snapshot: None,
        }
    }

    /// Expand from a fixed snapshot instead of the process environment.
    pub fn with_snapshot(mut self, snapshot: EnvSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Register this extension on `registry` with its standard descriptor.
    pub fn register(self, registry: &ExtensionRegistry) {
        registry.register(
            ExtensionDescriptor::new(Self::NAME, Self::DESCRIPTION),
            move || self.clone(),
        );
    }
}

impl ConfigExtension for JsonEnvironmentExtension {
    fn apply(&self, builder: ConfigBuilder) -> Result<ConfigBuilder, ConfigError> {
        match &self.snapshot {
            Some(snapshot) => {
                add_json_environment_overrides_from(builder, snapshot, &self.prefix, self.mode)
            }
            None => add_json_environment_overrides(builder, &self.prefix, self.mode),
        }
    }
}
