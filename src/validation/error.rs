//! Error types for submission validation
//!
//! Every variant here is recovered inside the validators and turned into a
//! line of a [`ValidationReport`](super::ValidationReport). Nothing in this
//! module is surfaced to callers as an `Err` from a `validate_*` method.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaName;

/// Errors raised while pulling the settings or dataset section out of a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Raw payload is not JSON
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    /// `data.<section>` is absent or null
    #[error("Payload is missing 'data.{0}'")]
    MissingSection(&'static str),

    /// `data.<section>` exists but is not an object
    #[error("Payload section 'data.{0}' is not an object")]
    NotAnObject(&'static str),
}

/// A payload unit failed (or could not be checked against) a named schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The instance did not conform to the schema
    #[error("{schema} validation failed at path '{path}': {message}")]
    Violation {
        schema: SchemaName,
        path: String,
        message: String,
    },

    /// No schema is registered under this name
    #[error("No '{0}' schema is registered")]
    Missing(SchemaName),
}

/// Per-entry failures while validating uploaded files
#[derive(Error, Debug)]
pub enum UploadError {
    /// Entry carries no usable `file_temp` path
    #[error("Upload entry has no 'file_temp' path")]
    MissingPath,

    /// Content could not be read for MIME detection
    #[error("Failed to detect MIME type of {path}: {source}")]
    Sniff {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content could not be read for hashing
    #[error("Failed to hash {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Detected type is outside the accepted list
    #[error(
        "Problem: Uploaded file, '{}', must be one of the formats:\n       {}",
        .path.display(),
        .accepted.join(", ")
    )]
    UnacceptableType {
        path: PathBuf,
        mime: String,
        accepted: Vec<String>,
    },
}

impl UploadError {
    /// Message reported back to the submitter for the upload at `index`
    ///
    /// File access problems are collapsed to a re-upload hint; the detailed
    /// cause only goes to the log.
    pub fn user_message(&self, index: usize) -> String {
        match self {
            UploadError::UnacceptableType { .. } => self.to_string(),
            UploadError::MissingPath | UploadError::Sniff { .. } | UploadError::Hash { .. } => {
                format!(
                    "Problem with file upload #{}. Please re-upload the file.",
                    index
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unacceptable_type_message_lists_formats() {
        let err = UploadError::UnacceptableType {
            path: PathBuf::from("/tmp/upload_1"),
            mime: "application/pdf".to_string(),
            accepted: vec!["text/plain".to_string(), "text/csv".to_string()],
        };
        assert_eq!(
            err.user_message(3),
            "Problem: Uploaded file, '/tmp/upload_1', must be one of the formats:\n       text/plain, text/csv"
        );
    }

    #[test]
    fn test_access_errors_collapse_to_reupload_hint() {
        let err = UploadError::Hash {
            path: PathBuf::from("/tmp/gone"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.user_message(2),
            "Problem with file upload #2. Please re-upload the file."
        );
        assert_eq!(
            UploadError::MissingPath.user_message(0),
            "Problem with file upload #0. Please re-upload the file."
        );
    }

    #[test]
    fn test_schema_violation_display() {
        let err = SchemaError::Violation {
            schema: SchemaName::Training,
            path: "/svm_session".to_string(),
            message: "\"bogus\" is not one of [\"data_new\"]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "training validation failed at path '/svm_session': \"bogus\" is not one of [\"data_new\"]"
        );
    }
}
