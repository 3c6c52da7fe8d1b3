use super::ConverterConfig;
use crate::error::{ConverterError, ErrorCode, Result};
use std::path::Path;
use tokio::fs;

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConverterError::config_with_code(
                ErrorCode::CONFIG_UNSUPPORTED_FORMAT,
                format!(
                    "Unsupported configuration format for {} (expected .toml, .yaml, .yml or .json)",
                    path.display()
                ),
            )),
        }
    }
}

impl ConverterConfig {
    /// Read and parse a configuration file, picking the format by extension
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;
        let config = Self::parse(&content, format)?;

        tracing::debug!(
            "Loaded converter configuration from {} ({:?})",
            path.display(),
            format
        );
        Ok(config)
    }
}
