//! Validate command implementation

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use svm_data_validator::{Payload, ValidationReport, Validator, ValidatorConfig};

use crate::Target;

/// Load input content from file or stdin
fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// Handle the validate command; returns whether every report passed
pub fn handle_validate(
    config_path: Option<&Path>,
    schemas: Option<PathBuf>,
    target: Target,
    input: &str,
) -> Result<bool> {
    let mut config = match config_path {
        Some(path) => ValidatorConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    if schemas.is_some() {
        config.schema_dir = schemas;
    }

    let validator = Validator::from_config(&config).context("Failed to build validator")?;
    let payload = Payload::from_json(&load_input(input)?);

    let mut output = Map::new();
    let mut passed = true;

    if matches!(target, Target::Settings | Target::All) {
        let report = validator.validate_settings(&payload);
        passed &= report.status;
        output.insert("settings".to_string(), serde_json::to_value(report)?);
    }

    if matches!(target, Target::Dataset | Target::All) {
        let report = match payload.dataset() {
            Ok(dataset) => validator.validate_dataset(&Value::Object(dataset.clone())),
            Err(e) => ValidationReport::from_errors(vec![e.to_string()]),
        };
        passed &= report.status;
        output.insert("dataset".to_string(), serde_json::to_value(report)?);
    }

    if matches!(target, Target::Uploads | Target::All) {
        let report = validator.validate_uploads(&payload);
        passed &= report.status;
        output.insert("uploads".to_string(), serde_json::to_value(report)?);
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(passed)
}
