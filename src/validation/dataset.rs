//! Dataset record validation
//!
//! Checks the record-bearing mapping `{svm_dataset: [...], id_entity: ...}`.
//! Every failing record contributes one error; nothing short-circuits.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::ValidationReport;
use crate::schema::{SchemaCatalog, SchemaName};

/// Validates dataset records and the owning entity id
pub struct DatasetRecordValidator<'a> {
    catalog: &'a dyn SchemaCatalog,
}

impl<'a> DatasetRecordValidator<'a> {
    pub fn new(catalog: &'a dyn SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Validate a record mapping; keys other than `svm_dataset` and `id_entity` are ignored
    pub fn validate_dataset(&self, records: &Value) -> ValidationReport {
        let Some(records) = records.as_object() else {
            return ValidationReport::from_errors(vec![
                "Dataset records must be a JSON object".to_string(),
            ]);
        };

        let mut errors = Vec::new();
        for (key, value) in records {
            match key.as_str() {
                "svm_dataset" => self.check_records(value, &mut errors),
                "id_entity" => {
                    let wrapped = json!({ "id_entity": value });
                    if let Err(e) = self.catalog.check(SchemaName::DatasetId, &wrapped) {
                        errors.push(e.to_string());
                    }
                }
                other => debug!("Ignoring dataset key '{}'", other),
            }
        }

        info!("Validated dataset records: {} error(s)", errors.len());
        ValidationReport::from_errors(errors)
    }

    fn check_records(&self, value: &Value, errors: &mut Vec<String>) {
        let Some(entries) = value.as_array() else {
            errors.push("'svm_dataset' must be a list of records".to_string());
            return;
        };

        for entry in entries {
            if let Err(e) = self.catalog.check(SchemaName::DatasetRecord, entry) {
                errors.push(e.to_string());
            }
        }
    }
}
