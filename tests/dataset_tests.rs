//! Dataset record validation tests

use std::cell::RefCell;

use serde_json::{Value, json};
use svm_data_validator::{
    DatasetRecordValidator, JsonSchemaCatalog, SchemaCatalog, SchemaError, SchemaName, Validator,
};

fn validator() -> Validator {
    let catalog = JsonSchemaCatalog::from_schemas([
        (
            SchemaName::DatasetRecord,
            json!({
                "type": "object",
                "required": ["dependent-variable", "independent-variables"],
                "properties": {
                    "dependent-variable": { "type": "string" },
                    "independent-variables": {
                        "type": "array",
                        "items": { "type": "number" },
                        "minItems": 1
                    }
                }
            }),
        ),
        (
            SchemaName::DatasetId,
            json!({
                "type": "object",
                "required": ["id_entity"],
                "properties": { "id_entity": { "type": "integer", "minimum": 1 } }
            }),
        ),
    ])
    .unwrap();
    Validator::new(catalog)
}

fn valid_record() -> Value {
    json!({ "dependent-variable": "rock", "independent-variables": [0.2, 1.4] })
}

fn invalid_record() -> Value {
    json!({ "dependent-variable": "sand", "independent-variables": [] })
}

/// Counts checks per schema and rejects dataset records
#[derive(Default)]
struct CountingCatalog {
    checked: RefCell<Vec<SchemaName>>,
}

impl SchemaCatalog for CountingCatalog {
    fn check(&self, schema: SchemaName, _instance: &Value) -> Result<(), SchemaError> {
        self.checked.borrow_mut().push(schema);
        match schema {
            SchemaName::DatasetRecord => Err(SchemaError::Violation {
                schema,
                path: "root".to_string(),
                message: "rejected".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

mod record_tests {
    use super::*;

    #[test]
    fn test_valid_records_pass() {
        let report = validator().validate_dataset(&json!({
            "svm_dataset": [valid_record(), valid_record()],
            "id_entity": 7
        }));

        assert!(report.status);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_one_error_per_failing_unit() {
        let report = validator().validate_dataset(&json!({
            "svm_dataset": [valid_record(), invalid_record()],
            "id_entity": "x"
        }));

        assert!(!report.status);
        let errors = report.errors();
        assert_eq!(errors.len(), 2, "errors: {errors:?}");
        assert!(errors.iter().any(|e| e.starts_with("dataset-record validation failed")));
        assert!(errors.iter().any(|e| e.starts_with("dataset-id validation failed")));
    }

    #[test]
    fn test_records_after_a_failure_are_still_checked() {
        let report = validator().validate_dataset(&json!({
            "svm_dataset": [invalid_record(), valid_record(), json!({ "dependent-variable": 3 })]
        }));

        assert_eq!(report.errors().len(), 2);

        let catalog = CountingCatalog::default();
        let report = DatasetRecordValidator::new(&catalog).validate_dataset(&json!({
            "svm_dataset": [1, 2, 3]
        }));
        assert_eq!(report.errors().len(), 3);
        assert_eq!(catalog.checked.borrow().len(), 3);
    }

    #[test]
    fn test_id_entity_is_wrapped_before_checking() {
        let report = validator().validate_dataset(&json!({ "id_entity": 0 }));
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].contains("/id_entity"));
    }
}

mod structural_tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_ignored() {
        let catalog = CountingCatalog::default();
        let report = DatasetRecordValidator::new(&catalog).validate_dataset(&json!({
            "file_upload": [{ "file_temp": ["/tmp/a"] }],
            "notes": "ignored"
        }));

        assert!(report.status);
        assert!(catalog.checked.borrow().is_empty());
    }

    #[test]
    fn test_empty_mapping_passes() {
        assert!(validator().validate_dataset(&json!({})).status);
    }

    #[test]
    fn test_malformed_key_does_not_abort_siblings() {
        let report = validator().validate_dataset(&json!({
            "svm_dataset": "not a list",
            "id_entity": -1
        }));

        let errors = report.errors();
        assert_eq!(errors.len(), 2, "errors: {errors:?}");
        assert!(errors.contains(&"'svm_dataset' must be a list of records".to_string()));
        assert!(errors.iter().any(|e| e.starts_with("dataset-id validation failed")));
    }

    #[test]
    fn test_non_object_mapping() {
        let report = validator().validate_dataset(&json!([valid_record()]));
        assert_eq!(
            report.error,
            Some(vec!["Dataset records must be a JSON object".to_string()])
        );
    }
}
