//! Settings validation
//!
//! Routes `data.settings` to the schema matching the session mode and
//! collects every failure into a [`ValidationReport`].

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::ValidationReport;
use crate::payload::{Payload, SessionMode};
use crate::schema::SchemaCatalog;

/// Message reported when `data.settings` cannot be read at all
pub const SETTINGS_NOT_CONFIGURED: &str = "The SVM settings have not been properly configured";

/// Validates submitted session settings
pub struct SettingsValidator<'a> {
    catalog: &'a dyn SchemaCatalog,
}

impl<'a> SettingsValidator<'a> {
    pub fn new(catalog: &'a dyn SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Validate the settings section of `payload`
    pub fn validate_settings(&self, payload: &Payload) -> ValidationReport {
        let mut errors = Vec::new();
        let mode = payload.session_mode();

        match payload.settings() {
            Ok(settings) => {
                let instance = Value::Object(settings.clone());
                if let Some(schema) = mode.settings_schema()
                    && let Err(e) = self.catalog.check(schema, &instance)
                {
                    errors.push(e.to_string());
                }

                if mode == SessionMode::DataNew {
                    inspect_uploaded_dataset(settings);
                }
            }
            Err(e) => {
                debug!("Settings section unusable: {}", e);
                errors.push(SETTINGS_NOT_CONFIGURED.to_string());
            }
        }

        info!(
            "Validated {} settings: {} error(s)",
            mode,
            errors.len()
        );
        ValidationReport::from_errors(errors)
    }
}

/// Hook for `data_new` sessions that submit an XML dataset inline
///
/// Entries are only traced for now; structural checks on them belong to
/// [`DatasetRecordValidator`](super::DatasetRecordValidator).
fn inspect_uploaded_dataset(settings: &Map<String, Value>) {
    if settings.get("svm_dataset_type").and_then(Value::as_str) != Some("upload file") {
        return;
    }

    if let Some(entries) = settings.get("svm_dataset").and_then(Value::as_array) {
        for (index, entry) in entries.iter().enumerate() {
            debug!("svm_dataset[{}]: {}", index, entry);
        }
    }
}
