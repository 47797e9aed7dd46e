//! Report types returned by every validation operation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a validation call: `{status, error}`
///
/// `status` is true exactly when `error` is `None`; an error list is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: bool,
    pub error: Option<Vec<String>>,
}

impl ValidationReport {
    /// A passing report
    pub fn passed() -> Self {
        Self {
            status: true,
            error: None,
        }
    }

    /// Build a report from the errors collected during a pass
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::passed()
        } else {
            Self {
                status: false,
                error: Some(errors),
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status
    }

    /// Collected error messages, empty when the report passed
    pub fn errors(&self) -> &[String] {
        self.error.as_deref().unwrap_or_default()
    }
}

/// Outcome of upload validation: `{status, error, json_data}`
///
/// `json_data` carries the sanitized dataset object only when the report
/// passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadValidationReport {
    pub status: bool,
    pub error: Option<Vec<String>>,
    pub json_data: Option<Map<String, Value>>,
}

impl UploadValidationReport {
    /// Pair collected errors with the sanitized dataset, dropping the dataset on failure
    pub fn new(errors: Vec<String>, sanitized: Map<String, Value>) -> Self {
        if errors.is_empty() {
            Self {
                status: true,
                error: None,
                json_data: Some(sanitized),
            }
        } else {
            Self::failed(errors)
        }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            status: false,
            error: Some(errors),
            json_data: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status
    }

    pub fn errors(&self) -> &[String] {
        self.error.as_deref().unwrap_or_default()
    }
}
