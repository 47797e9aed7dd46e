//! Submission payload parsing
//!
//! A submission looks like
//! `{"data": {"settings": {...}, "dataset": {...}}}`. [`Payload`] splits it
//! once into its two sections and the session mode, so that every validator
//! works from the same immutable view.

use std::fmt;

use serde_json::{Map, Value};

use crate::schema::SchemaName;
use crate::validation::PayloadError;

/// Session mode named by `data.settings.svm_session`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Train a model on a freshly supplied dataset
    DataNew,
    /// Append to an existing dataset
    DataAppend,
    /// Generate a model from a stored dataset
    ModelGenerate,
    /// Run analysis with an existing model
    ModelUse,
    /// Missing, non-string or unrecognised session value
    Unknown,
}

impl SessionMode {
    /// Parse a session value; case-insensitive, never fails
    ///
    /// Surrounding whitespace is not stripped, so `" data_new "` is unknown.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "data_new" => SessionMode::DataNew,
            "data_append" => SessionMode::DataAppend,
            "model_generate" => SessionMode::ModelGenerate,
            "model_use" => SessionMode::ModelUse,
            _ => SessionMode::Unknown,
        }
    }

    /// Schema the session's settings are validated against, if any
    pub fn settings_schema(&self) -> Option<SchemaName> {
        match self {
            SessionMode::DataNew => Some(SchemaName::Training),
            SessionMode::ModelUse => Some(SchemaName::Analysis),
            SessionMode::DataAppend | SessionMode::ModelGenerate | SessionMode::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::DataNew => "data_new",
            SessionMode::DataAppend => "data_append",
            SessionMode::ModelGenerate => "model_generate",
            SessionMode::ModelUse => "model_use",
            SessionMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed view of a raw submission
#[derive(Debug, Clone)]
pub struct Payload {
    settings: Result<Map<String, Value>, PayloadError>,
    dataset: Result<Map<String, Value>, PayloadError>,
    session_mode: SessionMode,
}

impl Payload {
    /// Parse a raw JSON submission
    ///
    /// Never fails: structural problems are kept per section and reported
    /// by whichever validator needs that section.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                let err = PayloadError::InvalidJson(e.to_string());
                Self {
                    settings: Err(err.clone()),
                    dataset: Err(err),
                    session_mode: SessionMode::Unknown,
                }
            }
        }
    }

    /// Build a payload from an already-decoded JSON document
    pub fn from_value(mut value: Value) -> Self {
        let mut data = value
            .get_mut("data")
            .and_then(Value::as_object_mut)
            .map(std::mem::take)
            .unwrap_or_default();

        let settings = take_section(&mut data, "settings");
        let dataset = take_section(&mut data, "dataset");

        let session_mode = settings
            .as_ref()
            .ok()
            .and_then(|s| s.get("svm_session"))
            .and_then(Value::as_str)
            .map(SessionMode::parse)
            .unwrap_or(SessionMode::Unknown);

        Self {
            settings,
            dataset,
            session_mode,
        }
    }

    /// The `data.settings` object
    pub fn settings(&self) -> Result<&Map<String, Value>, &PayloadError> {
        self.settings.as_ref()
    }

    /// The `data.dataset` object
    pub fn dataset(&self) -> Result<&Map<String, Value>, &PayloadError> {
        self.dataset.as_ref()
    }

    pub fn session_mode(&self) -> SessionMode {
        self.session_mode
    }
}

fn take_section(
    data: &mut Map<String, Value>,
    section: &'static str,
) -> Result<Map<String, Value>, PayloadError> {
    match data.remove(section) {
        None | Some(Value::Null) => Err(PayloadError::MissingSection(section)),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(PayloadError::NotAnObject(section)),
    }
}
