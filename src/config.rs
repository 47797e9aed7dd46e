//! Validator configuration
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! accepted_mime_types = ["text/plain", "text/csv", "application/xml"]
//! sniff_bytes = 8192
//! schema_dir = "/etc/svm/schemas"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME types accepted for uploaded datasets unless configured otherwise
pub const DEFAULT_ACCEPTED_MIME_TYPES: [&str; 3] = ["text/plain", "text/csv", "application/xml"];

/// Bytes read from the head of an upload for content sniffing
pub const DEFAULT_SNIFF_BYTES: usize = 8192;

/// Errors raised while building a validator from configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Schema could not be loaded or compiled
    #[error("Schema error: {0}")]
    Schema(String),
}

/// Configuration for submission validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// MIME types an uploaded file may sniff as
    pub accepted_mime_types: Vec<String>,
    /// Maximum number of bytes inspected by the MIME sniffer
    pub sniff_bytes: usize,
    /// Directory holding `<name>.schema.{json,yaml}` files
    pub schema_dir: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            accepted_mime_types: DEFAULT_ACCEPTED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            schema_dir: None,
        }
    }
}

impl ValidatorConfig {
    /// Create a new builder for ValidatorConfig
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ValidatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// A relative `schema_dir` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(dir) = &config.schema_dir
            && dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.schema_dir = Some(parent.join(dir));
        }

        Ok(config)
    }

    /// Check the invariants a usable configuration must hold
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_mime_types.is_empty() {
            return Err(ConfigError::Invalid(
                "accepted_mime_types must list at least one MIME type".to_string(),
            ));
        }
        if let Some(bad) = self
            .accepted_mime_types
            .iter()
            .find(|m| m.trim().is_empty() || !m.contains('/'))
        {
            return Err(ConfigError::Invalid(format!(
                "'{}' is not a MIME type",
                bad
            )));
        }
        if self.sniff_bytes == 0 {
            return Err(ConfigError::Invalid(
                "sniff_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ValidatorConfig
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    accepted_mime_types: Option<Vec<String>>,
    sniff_bytes: Option<usize>,
    schema_dir: Option<PathBuf>,
}

impl ValidatorConfigBuilder {
    /// Replace the accepted MIME type list
    pub fn accepted_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_mime_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Set the sniff window in bytes
    pub fn sniff_bytes(mut self, sniff_bytes: usize) -> Self {
        self.sniff_bytes = Some(sniff_bytes);
        self
    }

    /// Set the schema directory
    pub fn schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    /// Build the ValidatorConfig
    pub fn build(self) -> Result<ValidatorConfig, ConfigError> {
        let defaults = ValidatorConfig::default();
        let config = ValidatorConfig {
            accepted_mime_types: self
                .accepted_mime_types
                .unwrap_or(defaults.accepted_mime_types),
            sniff_bytes: self.sniff_bytes.unwrap_or(defaults.sniff_bytes),
            schema_dir: self.schema_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(
            config.accepted_mime_types,
            vec!["text/plain", "text/csv", "application/xml"]
        );
        assert_eq!(config.sniff_bytes, 8192);
        assert!(config.schema_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = ValidatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = ValidatorConfig::from_toml_str(
            r#"
            accepted_mime_types = ["text/csv"]
            sniff_bytes = 512
            schema_dir = "/srv/schemas"
            "#,
        )
        .unwrap();
        assert_eq!(config.accepted_mime_types, vec!["text/csv"]);
        assert_eq!(config.sniff_bytes, 512);
        assert_eq!(config.schema_dir, Some(PathBuf::from("/srv/schemas")));
    }

    #[test]
    fn test_rejects_empty_accepted_list() {
        let result = ValidatorConfig::from_toml_str("accepted_mime_types = []");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = ValidatorConfig::from_toml_str("sniff_bytes = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_builder() {
        let config = ValidatorConfig::builder()
            .accepted_mime_types(["text/plain", "application/json"])
            .sniff_bytes(1024)
            .schema_dir("schemas")
            .build()
            .unwrap();
        assert_eq!(config.accepted_mime_types, vec!["text/plain", "application/json"]);
        assert_eq!(config.sniff_bytes, 1024);
        assert_eq!(config.schema_dir, Some(PathBuf::from("schemas")));

        assert!(ValidatorConfig::builder().sniff_bytes(0).build().is_err());
        assert!(ValidatorConfig::builder()
            .accepted_mime_types(["csv"])
            .build()
            .is_err());
    }

    #[test]
    fn test_load_resolves_relative_schema_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validator.toml");
        std::fs::write(&path, "schema_dir = \"schemas\"\n").unwrap();

        let config = ValidatorConfig::load(&path).unwrap();
        assert_eq!(config.schema_dir, Some(dir.path().join("schemas")));
    }
}
