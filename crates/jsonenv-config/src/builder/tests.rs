//! Tests for layered configuration building.

use super::*;
use crate::environment::EnvSnapshot;
use crate::json_env::{JSON_ENVIRONMENT_SOURCE, ParseErrorMode};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// A JSON5 file flattens into path-keyed entries.
#[test]
fn file_source_flattens_document() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("app.json5");
    write_json5(
        &path,
        "{ App: { Hosts: ['a', 'b'], Retries: '3', Debug: true, Proxy: null } }",
    );

    let config = ConfigBuilder::new()
        .add_source(JsonFileSource::required(&path))
        .build()
        .expect("config");

    assert_eq!(config.get("App:Hosts:0"), Some("a"));
    assert_eq!(config.get("App:Hosts:1"), Some("b"));
    assert_eq!(config.get("App:Retries"), Some("3"));
    assert_eq!(config.get("App:Debug"), Some("true"));
    assert_eq!(config.get_entry("App:Proxy"), Some(None));
}

#[test]
fn missing_optional_file_is_empty() {
    let temp = TempDir::new().expect("tmp");
    let config = ConfigBuilder::new()
        .add_source(JsonFileSource::optional(temp.path().join("absent.json5")))
        .build()
        .expect("config");
    assert!(config.is_empty());
    assert_eq!(config.layers().len(), 1);
}

#[test]
fn missing_required_file_fails() {
    let temp = TempDir::new().expect("tmp");
    let err = ConfigBuilder::new()
        .add_source(JsonFileSource::required(temp.path().join("absent.json5")))
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn scalar_file_root_is_rejected() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("scalar.json5");
    write_json5(&path, "42");
    let err = ConfigBuilder::new()
        .add_source(JsonFileSource::required(&path))
        .build()
        .unwrap_err();
    assert!(format!("{err}").contains("root must be an object or array"));
}

/// Later ordinary sources take precedence over earlier ones.
#[test]
fn later_sources_win() {
    let config = ConfigBuilder::new()
        .add_source(MemorySource::from_pairs("defaults", [("Level", "info"), ("Name", "svc")]))
        .add_source(MemorySource::from_pairs("local", [("level", "debug")]))
        .build()
        .expect("config");
    assert_eq!(config.get("LEVEL"), Some("debug"));
    assert_eq!(config.get("Name"), Some("svc"));
}

/// Overlays beat ordinary sources regardless of insertion order.
#[test]
fn overlay_outranks_sources_added_later() {
    let snapshot = EnvSnapshot::from_pairs([("App__Hosts", r#"["env-a", "env-b"]"#)]);
    let builder = ConfigBuilder::new()
        .add_json_environment_from(&snapshot, "App", ParseErrorMode::Strict)
        .expect("overlay")
        .add_source(MemorySource::from_pairs(
            "late",
            [("App:Hosts:0", "file-a"), ("App:Name", "svc")],
        ));

    assert_eq!(
        builder.sources(),
        vec![
            ConfigLayer {
                name: "late".to_string(),
                tier: SourceTier::Ordinary,
            },
            ConfigLayer {
                name: JSON_ENVIRONMENT_SOURCE.to_string(),
                tier: SourceTier::Overlay,
            },
        ]
    );

    let config = builder.build().expect("config");
    assert_eq!(config.get("App:Hosts:0"), Some("env-a"));
    assert_eq!(config.get("App:Hosts:1"), Some("env-b"));
    assert_eq!(config.get("App:Name"), Some("svc"));
}

/// Null overlay entries mask lower values instead of disappearing.
#[test]
fn overlay_null_masks_lower_value() {
    let snapshot = EnvSnapshot::from_pairs([("App__Proxy", r#"{"Url": null}"#)]);
    let config = ConfigBuilder::new()
        .add_source(MemorySource::from_pairs("base", [("App:Proxy:Url", "http://proxy")]))
        .add_json_environment_from(&snapshot, "App", ParseErrorMode::Strict)
        .expect("overlay")
        .build()
        .expect("config");
    assert_eq!(config.get_entry("App:Proxy:Url"), Some(None));
    assert_eq!(config.get("App:Proxy:Url"), None);
    assert!(config.contains_key("App:Proxy:Url"));
}

#[test]
fn section_and_child_keys() {
    let config = ConfigBuilder::new()
        .add_source(MemorySource::from_pairs(
            "base",
            [
                ("App:Servers:0:Host", "a"),
                ("App:Servers:1:Host", "b"),
                ("App:Name", "svc"),
                ("Other:Key", "x"),
            ],
        ))
        .build()
        .expect("config");

    assert_eq!(config.child_keys("App"), vec!["Name", "Servers"]);
    assert_eq!(config.child_keys(""), vec!["App", "Other"]);

    let servers = config.section("app:servers");
    assert_eq!(servers.len(), 2);
    assert_eq!(servers.get("1:Host"), Some("b"));
    assert_eq!(servers.to_json(), json!([{ "Host": "a" }, { "Host": "b" }]));
}

/// A failing source aborts the build.
#[test]
fn source_errors_propagate() {
    struct Broken;

    impl ConfigSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn load(&self) -> Result<OverrideMap, ConfigError> {
            Err(ConfigError::Invalid("boom".to_string()))
        }
    }

    let err = ConfigBuilder::new()
        .add_source(MemorySource::from_pairs("ok", [("a", "1")]))
        .add_source(Broken)
        .build()
        .unwrap_err();
    assert_eq!(format!("{err}"), "invalid config: boom");
}
