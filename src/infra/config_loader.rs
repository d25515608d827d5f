// ============================================================
// Layer 6 — Configuration Loader
// ============================================================
// Reads the hyperparameter file as an untyped JSON mapping.
//
//   config/config.json
//   {"C": 1.0, "solver": "lbfgs", "max_iter": 1000}
//
// Only the *shape* is checked here (a JSON object). Key and
// type checks belong to Hyperparameters::from_config, so a
// file with extra or unexpected keys still loads unchanged.
//
// Reference: serde_json documentation, Rust Book §9

use std::{fs, io, path::Path};

use serde_json::Value;

use crate::domain::error::PipelineError;
use crate::domain::hyperparams::ConfigMap;

/// Read and parse a JSON object of hyperparameters.
pub fn load_config(path: &Path) -> Result<ConfigMap, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::ConfigNotFound(path.to_path_buf()),
        _ => PipelineError::Io(e),
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|e| PipelineError::ConfigMalformed {
        path:   path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => {
            tracing::debug!("Loaded {} configuration keys from '{}'", map.len(), path.display());
            Ok(map)
        }
        other => Err(PipelineError::ConfigMalformed {
            path:   path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}
