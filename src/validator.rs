//! Validator facade
//!
//! Bundles a schema catalog, a MIME sniffer, a content hasher and the
//! configuration, and hands out the component validators.

use serde_json::Value;

use crate::config::{ConfigError, ValidatorConfig};
use crate::payload::Payload;
use crate::schema::{JsonSchemaCatalog, SchemaCatalog};
use crate::validation::{
    ContentHasher, DatasetRecordValidator, MagicSniffer, MimeSniffer, Sha256Hasher,
    SettingsValidator, UploadValidationReport, UploadValidator, ValidationReport,
};

/// Entry point for validating SVM submissions
///
/// Immutable once built; one instance can serve any number of payloads.
pub struct Validator {
    catalog: Box<dyn SchemaCatalog>,
    /// Sniffer supplied through [`Validator::with_sniffer`]
    sniffer: Option<Box<dyn MimeSniffer>>,
    /// Built-in sniffer, sized by `config.sniff_bytes`
    magic: MagicSniffer,
    hasher: Box<dyn ContentHasher>,
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default sniffer, hasher and configuration
    pub fn new(catalog: impl SchemaCatalog + 'static) -> Self {
        let config = ValidatorConfig::default();
        Self {
            catalog: Box::new(catalog),
            sniffer: None,
            magic: MagicSniffer::new(config.sniff_bytes),
            hasher: Box::new(Sha256Hasher),
            config,
        }
    }

    /// Build a validator whose schemas are loaded from `config.schema_dir`
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dir = config.schema_dir.as_ref().ok_or_else(|| {
            ConfigError::Invalid("schema_dir is required to load schemas".to_string())
        })?;
        let catalog = JsonSchemaCatalog::from_dir(dir)?;
        Ok(Self::new(catalog).with_config(config.clone()))
    }

    /// Replace the configuration
    ///
    /// A sniffer set with [`with_sniffer`](Self::with_sniffer) is kept; the
    /// new `sniff_bytes` only applies to the built-in [`MagicSniffer`].
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.magic = MagicSniffer::new(config.sniff_bytes);
        self.config = config;
        self
    }

    pub fn with_sniffer(mut self, sniffer: impl MimeSniffer + 'static) -> Self {
        self.sniffer = Some(Box::new(sniffer));
        self
    }

    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn settings(&self) -> SettingsValidator<'_> {
        SettingsValidator::new(self.catalog.as_ref())
    }

    pub fn dataset(&self) -> DatasetRecordValidator<'_> {
        DatasetRecordValidator::new(self.catalog.as_ref())
    }

    pub fn uploads(&self) -> UploadValidator<'_> {
        let sniffer: &dyn MimeSniffer = match &self.sniffer {
            Some(sniffer) => sniffer.as_ref(),
            None => &self.magic,
        };
        UploadValidator::new(
            sniffer,
            self.hasher.as_ref(),
            &self.config.accepted_mime_types,
        )
    }

    pub fn validate_settings(&self, payload: &Payload) -> ValidationReport {
        self.settings().validate_settings(payload)
    }

    pub fn validate_dataset(&self, records: &Value) -> ValidationReport {
        self.dataset().validate_dataset(records)
    }

    pub fn validate_uploads(&self, payload: &Payload) -> UploadValidationReport {
        self.uploads().validate_uploads(payload)
    }
}
