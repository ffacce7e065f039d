//! Rendering of built configuration for the command line.

use jsonenv_config::{Config, SourceTier};
use serde::Serialize;
use serde_json::Value;

/// Output format for the effective configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `key=value` line per entry.
    #[default]
    Lines,
    /// A JSON document with the layers and the rebuilt tree.
    Json,
}

#[derive(Debug, Serialize)]
struct LayerReport<'a> {
    name: &'a str,
    overlay: bool,
}

#[derive(Debug, Serialize)]
struct ConfigReport<'a> {
    layers: Vec<LayerReport<'a>>,
    entries: Value,
}

/// Render `config` in the requested format.
pub fn render(config: &Config, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Lines => Ok(render_lines(config)),
        OutputFormat::Json => render_json(config),
    }
}

/// Null entries render as `key= (null)`.
fn render_lines(config: &Config) -> String {
    config
        .iter()
        .map(|(path, value)| match value {
            Some(value) => format!("{path}={value}\n"),
            None => format!("{path}= (null)\n"),
        })
        .collect()
}

fn render_json(config: &Config) -> Result<String, serde_json::Error> {
    let report = ConfigReport {
        layers: config
            .layers()
            .iter()
            .map(|layer| LayerReport {
                name: &layer.name,
                overlay: layer.tier == SourceTier::Overlay,
            })
            .collect(),
        entries: config.to_json(),
    };
    serde_json::to_string_pretty(&report)
}
