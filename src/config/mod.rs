//! File-backed converter settings.
//!
//! A [`ConverterConfig`] can be written as TOML, YAML or JSON:
//!
//! ```toml
//! interrupt_on_step_failure = true
//! log_level = "debug"
//! attempt_timeout = "2s"
//! pipeline = ["double", { name = "suffix", option = { suffix = "Bar" } }]
//!
//! [plugin_options.suffix]
//! suffix = "!"
//! ```

use crate::converter::StepRef;
use crate::error::Result;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub mod loader;

pub use loader::ConfigFormat;

/// Converter settings, every field optional.
///
/// Keys left out of the file stay `None` and do not touch the settings a
/// caller already put on [`ConverterOptions`](crate::ConverterOptions).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_on_missing_plugin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_on_step_failure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    /// Upper bound for a single convert function attempt
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub attempt_timeout: Option<Duration>,
    /// Per-plugin option overrides merged into each plugin's default option
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub plugin_options: HashMap<String, Value>,
    /// Default step list for callers that run a configured pipeline
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pipeline: Vec<StepRef>,
}

impl ConverterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Parse `content` in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => Self::from_toml_str(content),
            ConfigFormat::Yaml => Self::from_yaml_str(content),
            ConfigFormat::Json => Self::from_json_str(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert!(config.log_level.is_none());
        assert!(config.interrupt_on_step_failure.is_none());
        assert!(config.attempt_timeout.is_none());
    }

    #[test]
    fn test_toml_config() {
        let config = ConverterConfig::from_toml_str(
            r#"
interrupt_on_step_failure = true
log_level = "debug"
attempt_timeout = "2s"
pipeline = ["double", { name = "suffix", option = { suffix = "Bar" } }]

[plugin_options.suffix]
suffix = "!"
tags = ["a", "b"]
"#,
        )
        .unwrap();

        assert_eq!(config.interrupt_on_step_failure, Some(true));
        assert_eq!(config.interrupt_on_missing_plugin, None);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.attempt_timeout, Some(Duration::from_secs(2)));
        assert_eq!(
            config.plugin_options["suffix"],
            json!({ "suffix": "!", "tags": ["a", "b"] })
        );
        assert_eq!(
            config.pipeline,
            vec![
                StepRef::from("double"),
                StepRef::with_option("suffix", json!({ "suffix": "Bar" })),
            ]
        );
    }

    #[test]
    fn test_yaml_config() {
        let config = ConverterConfig::from_yaml_str(
            r#"
interrupt_on_missing_plugin: true
attempt_timeout: 500ms
plugin_options:
  prefix:
    prefix: Foo
pipeline:
  - prefix
"#,
        )
        .unwrap();

        assert_eq!(config.interrupt_on_missing_plugin, Some(true));
        assert_eq!(config.attempt_timeout, Some(Duration::from_millis(500)));
        assert_eq!(config.plugin_options["prefix"], json!({ "prefix": "Foo" }));
        assert_eq!(config.pipeline, vec![StepRef::from("prefix")]);
    }

    #[test]
    fn test_json_config() {
        let config = ConverterConfig::parse(
            r#"{ "log_level": "error", "pipeline": [{ "name": "double" }] }"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.log_level, Some(LogLevel::Error));
        assert_eq!(config.pipeline[0].name(), "double");
    }

    #[test]
    fn test_invalid_input_maps_to_config_codes() {
        let err = ConverterConfig::from_toml_str("log_level = ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_TOML);

        let err = ConverterConfig::from_yaml_str("log_level: [").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_YAML);

        let err = ConverterConfig::from_json_str(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_JSON);
    }

    #[test]
    fn test_serializes_back_to_json() {
        let config = ConverterConfig {
            attempt_timeout: Some(Duration::from_secs(3)),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["attempt_timeout"], json!("3s"));
        assert!(value.get("pipeline").is_none());
        assert!(value.get("log_level").is_none());
        assert!(value.get("interrupt_on_step_failure").is_none());
    }
}
