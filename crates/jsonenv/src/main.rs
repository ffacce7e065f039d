//! Print the effective configuration after JSON environment expansion.

use anyhow::{Context, bail};
use clap::Parser;
use jsonenv::config::{
    ConfigBuilder, EnvironmentSource, ExtensionRegistry, JsonEnvironmentExtension, JsonFileSource,
    ParseErrorMode, default_user_config_path,
};
use jsonenv::report::{OutputFormat, render};
use log::{debug, info};
use std::path::PathBuf;

/// Command-line options for the jsonenv binary.
#[derive(Parser)]
#[command(name = "jsonenv", version)]
struct Cli {
    /// Prefix of environment variables holding JSON objects or arrays
    #[arg(long)]
    prefix: String,
    /// Skip variables with malformed JSON instead of failing
    #[arg(long)]
    lenient: bool,
    /// Required JSON5 config files, lowest precedence first
    #[arg(long = "config")]
    configs: Vec<PathBuf>,
    /// Include the optional ~/.jsonenv/jsonenv.json5 layer
    #[arg(long)]
    user_config: bool,
    /// Also load plain environment variables with this prefix
    #[arg(long)]
    env_prefix: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Lines)]
    format: OutputFormat,
    /// Print a single value instead of the whole configuration
    #[arg(long)]
    get: Option<String>,
}

fn main() -> anyhow::Result<()> {
    jsonenv::init_logging();

    let cli = Cli::parse();
    info!(
        "starting jsonenv (prefix={}, lenient={}, config_files={})",
        cli.prefix,
        cli.lenient,
        cli.configs.len()
    );

    let mut builder = ConfigBuilder::new();
    if cli.user_config {
        match default_user_config_path() {
            Some(path) => builder = builder.add_source(JsonFileSource::optional(path)),
            None => debug!("home directory not found; skipping user config"),
        }
    }
    for path in &cli.configs {
        builder = builder.add_source(JsonFileSource::required(path));
    }
    if let Some(prefix) = &cli.env_prefix {
        builder = builder.add_source(EnvironmentSource::with_prefix(prefix.clone()));
    }

    let mode = if cli.lenient {
        ParseErrorMode::Lenient
    } else {
        ParseErrorMode::Strict
    };
    let registry = ExtensionRegistry::new();
    JsonEnvironmentExtension::new(cli.prefix.clone(), mode).register(&registry);
    let builder = registry
        .apply_all(builder)
        .context("failed to expand JSON environment variables")?;

    let config = builder.build().context("failed to build configuration")?;

    if let Some(key) = &cli.get {
        match config.get_entry(key) {
            Some(Some(value)) => println!("{value}"),
            Some(None) => println!(),
            None => bail!("key not found: {key}"),
        }
        return Ok(());
    }

    let rendered = render(&config, cli.format).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
