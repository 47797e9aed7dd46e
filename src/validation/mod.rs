//! Validation functionality
//!
//! Provides validation logic for:
//! - Session settings (schema dispatch by session mode)
//! - Dataset records (per-record schema checks, aggregated)
//! - File uploads (MIME whitelist, content-hash deduplication)

pub mod dataset;
pub mod error;
pub mod hash;
pub mod mime;
pub mod report;
pub mod settings;
pub mod upload;

pub use dataset::DatasetRecordValidator;
pub use error::{PayloadError, SchemaError, UploadError};
pub use hash::{ContentHasher, Sha256Hasher};
pub use mime::{MagicSniffer, MimeSniffer};
pub use report::{UploadValidationReport, ValidationReport};
pub use settings::{SETTINGS_NOT_CONFIGURED, SettingsValidator};
pub use upload::{DATASET_NOT_CONFIGURED, FileRecord, NO_UPLOADS, UploadValidator};
