//! Schema catalog
//!
//! The validators never look inside a schema. They ask a [`SchemaCatalog`]
//! whether an instance satisfies one of four logical schemas and record the
//! answer. [`JsonSchemaCatalog`] is the stock implementation: it compiles
//! JSON Schema documents (written as JSON or YAML) with the `jsonschema`
//! crate once, up front.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ConfigError;
use crate::validation::SchemaError;

/// Logical schema names known to the validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    /// Settings of a `data_new` session
    Training,
    /// Settings of a `model_use` session
    Analysis,
    /// One entry of `svm_dataset`
    DatasetRecord,
    /// The `{id_entity: ...}` wrapper
    DatasetId,
}

impl SchemaName {
    pub const ALL: [SchemaName; 4] = [
        SchemaName::Training,
        SchemaName::Analysis,
        SchemaName::DatasetRecord,
        SchemaName::DatasetId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaName::Training => "training",
            SchemaName::Analysis => "analysis",
            SchemaName::DatasetRecord => "dataset-record",
            SchemaName::DatasetId => "dataset-id",
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown schema name: {}. Expected: training, analysis, dataset-record, dataset-id",
                    s
                )
            })
    }
}

/// Source of schema decisions for the validators
pub trait SchemaCatalog {
    /// Check `instance` against the schema registered as `schema`
    fn check(&self, schema: SchemaName, instance: &Value) -> Result<(), SchemaError>;
}

/// Format the first violation reported by `jsonschema` as a [`SchemaError`]
fn violation(schema: SchemaName, error: &jsonschema::ValidationError) -> SchemaError {
    let path = error.instance_path().to_string();
    let path = if path == "/" || path.is_empty() {
        "root".to_string()
    } else {
        path
    };

    SchemaError::Violation {
        schema,
        path,
        message: error.to_string(),
    }
}

/// [`SchemaCatalog`] backed by compiled JSON Schema validators
#[derive(Default)]
pub struct JsonSchemaCatalog {
    validators: HashMap<SchemaName, Validator>,
}

impl JsonSchemaCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a catalog from in-memory schema documents
    pub fn from_schemas(
        schemas: impl IntoIterator<Item = (SchemaName, Value)>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for (name, schema) in schemas {
            catalog.register(name, &schema)?;
        }
        Ok(catalog)
    }

    /// Load every `<name>.schema.{json,yaml,yml}` file found in `dir`
    ///
    /// Schemas that have no file are left unregistered; checking against
    /// them later yields [`SchemaError::Missing`].
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConfigError::Schema(format!(
                "Schema directory not found: {}",
                dir.display()
            )));
        }

        let mut catalog = Self::new();
        for name in SchemaName::ALL {
            for ext in ["json", "yaml", "yml"] {
                let path = dir.join(format!("{}.schema.{}", name, ext));
                if !path.is_file() {
                    continue;
                }

                let content = std::fs::read_to_string(&path)?;
                let schema: Value = if ext == "json" {
                    serde_json::from_str(&content).map_err(|e| {
                        ConfigError::Schema(format!("Failed to parse {}: {}", path.display(), e))
                    })?
                } else {
                    serde_yaml::from_str(&content).map_err(|e| {
                        ConfigError::Schema(format!("Failed to parse {}: {}", path.display(), e))
                    })?
                };

                catalog.register(name, &schema)?;
                debug!("Loaded {} schema from {}", name, path.display());
                break;
            }
        }

        info!(
            "Loaded {} of {} schemas from {}",
            catalog.len(),
            SchemaName::ALL.len(),
            dir.display()
        );
        Ok(catalog)
    }

    /// Compile `schema` and register it under `name`, replacing any previous one
    pub fn register(&mut self, name: SchemaName, schema: &Value) -> Result<(), ConfigError> {
        let validator = Validator::new(schema).map_err(|e| {
            ConfigError::Schema(format!("Failed to compile {} schema: {}", name, e))
        })?;
        self.validators.insert(name, validator);
        Ok(())
    }

    pub fn contains(&self, name: SchemaName) -> bool {
        self.validators.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl SchemaCatalog for JsonSchemaCatalog {
    fn check(&self, schema: SchemaName, instance: &Value) -> Result<(), SchemaError> {
        let validator = self
            .validators
            .get(&schema)
            .ok_or(SchemaError::Missing(schema))?;

        validator
            .validate(instance)
            .map_err(|error| violation(schema, &error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_name_round_trip() {
        for name in SchemaName::ALL {
            assert_eq!(name.as_str().parse::<SchemaName>().unwrap(), name);
        }
        assert!("model".parse::<SchemaName>().is_err());
    }

    #[test]
    fn test_check_reports_instance_path() {
        let catalog = JsonSchemaCatalog::from_schemas([(
            SchemaName::DatasetRecord,
            json!({
                "type": "object",
                "properties": { "value": { "type": "number" } }
            }),
        )])
        .unwrap();

        let err = catalog
            .check(SchemaName::DatasetRecord, &json!({ "value": "ten" }))
            .unwrap_err();
        match err {
            SchemaError::Violation { schema, path, .. } => {
                assert_eq!(schema, SchemaName::DatasetRecord);
                assert_eq!(path, "/value");
            }
            other => panic!("Expected Violation, got: {other}"),
        }
    }

    #[test]
    fn test_root_violation_uses_root_label() {
        let catalog = JsonSchemaCatalog::from_schemas([(
            SchemaName::DatasetId,
            json!({ "type": "object", "required": ["id_entity"] }),
        )])
        .unwrap();

        let err = catalog.check(SchemaName::DatasetId, &json!({})).unwrap_err();
        assert!(err.to_string().starts_with("dataset-id validation failed at path 'root'"));
    }

    #[test]
    fn test_unregistered_schema_is_missing() {
        let catalog = JsonSchemaCatalog::new();
        assert_eq!(
            catalog.check(SchemaName::Analysis, &json!({})),
            Err(SchemaError::Missing(SchemaName::Analysis))
        );
    }

    #[test]
    fn test_invalid_schema_fails_to_compile() {
        let result = JsonSchemaCatalog::from_schemas([(
            SchemaName::Training,
            json!({ "type": "not-a-type" }),
        )]);
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_from_dir_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("training.schema.json"),
            r#"{"type": "object", "required": ["svm_session"]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("dataset-id.schema.yaml"),
            "type: object\nrequired:\n  - id_entity\n",
        )
        .unwrap();

        let catalog = JsonSchemaCatalog::from_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(SchemaName::Training));
        assert!(catalog.contains(SchemaName::DatasetId));
        assert!(!catalog.contains(SchemaName::Analysis));

        assert!(catalog
            .check(SchemaName::DatasetId, &json!({ "id_entity": 4 }))
            .is_ok());
    }

    #[test]
    fn test_from_dir_missing_directory() {
        let result = JsonSchemaCatalog::from_dir("/nonexistent/svm/schemas");
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }
}
