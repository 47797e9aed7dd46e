//! SVM Data Validator - validation and sanitization of SVM submissions
//!
//! Provides validation for:
//! - Session settings, dispatched to a schema by session mode
//! - Dataset records and entity ids
//! - Uploaded dataset files (MIME whitelist, content-hash deduplication)
//!
//! Schemas are supplied by the deployer through a [`SchemaCatalog`]; this
//! crate only applies them and aggregates the results. Every validation
//! call returns a report instead of an error.
//!
//! ```no_run
//! use svm_data_validator::{Payload, Validator, ValidatorConfig};
//!
//! let config = ValidatorConfig::load("validator.toml")?;
//! let validator = Validator::from_config(&config)?;
//!
//! let payload = Payload::from_json(r#"{"data": {"settings": {"svm_session": "data_new"}}}"#);
//! let report = validator.validate_settings(&payload);
//! if !report.status {
//!     for error in report.errors() {
//!         eprintln!("{}", error);
//!     }
//! }
//! # Ok::<(), svm_data_validator::ConfigError>(())
//! ```

pub mod config;
pub mod payload;
pub mod schema;
pub mod validation;
pub mod validator;

pub use config::{ConfigError, ValidatorConfig, ValidatorConfigBuilder};
pub use payload::{Payload, SessionMode};
pub use schema::{JsonSchemaCatalog, SchemaCatalog, SchemaName};
pub use validation::{
    ContentHasher, DatasetRecordValidator, FileRecord, MagicSniffer, MimeSniffer, PayloadError,
    SchemaError, SettingsValidator, Sha256Hasher, UploadError, UploadValidationReport,
    UploadValidator, ValidationReport,
};
pub use validator::Validator;
