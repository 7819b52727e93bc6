//! Model parameter lookup.
//!
//! Model parameters are produced by an external parameter search and
//! consumed here as an opaque JSON blob keyed on the dataset name.

use std::fs;
use std::path::Path;

use serde_json::Value;
use stream_spi::{Result, StreamError};

use crate::params_file_name;

/// Opaque model configuration for one dataset.
///
/// Only `predictedField` is interpreted by this crate; everything else
/// belongs to the model implementation.
#[derive(Debug, Clone)]
pub struct ModelParams {
    dataset: String,
    value: Value,
}

impl ModelParams {
    /// Load params for a dataset from `<dir>/<dataset>_model_params.json`.
    ///
    /// A missing file is a configuration error: the parameter search
    /// has to be run first.
    pub fn load(dir: &Path, dataset: &str) -> Result<Self> {
        let path = dir.join(params_file_name(dataset));
        let text = fs::read_to_string(&path)
            .map_err(|_| StreamError::MissingModelParams(dataset.to_string()))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            StreamError::InvalidParams(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self {
            dataset: dataset.to_string(),
            value,
        })
    }

    /// Wrap an already-parsed params blob (used by tests).
    pub fn from_value(dataset: impl Into<String>, value: Value) -> Self {
        Self {
            dataset: dataset.into(),
            value,
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Field the model predicts, if the blob declares one.
    pub fn predicted_field(&self) -> Option<&str> {
        self.value.get("predictedField").and_then(Value::as_str)
    }

    /// Raw access to a top-level params entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Numeric params entry, if present and numeric.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.value.get(key).and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_load_missing_params_is_user_facing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelParams::load(dir.path(), "credit_card_small").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No model params exist for 'credit_card_small'. Run swarm first!"
        );
    }

    #[test]
    fn test_load_resolves_by_dataset_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim_fraud_small_model_params.json");
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, r#"{{"predictedField": "isFraud", "anomalyWindow": 50}}"#).unwrap();

        let params = ModelParams::load(dir.path(), "sim fraud-small").unwrap();
        assert_eq!(params.predicted_field(), Some("isFraud"));
        assert_eq!(params.get_f64("anomalyWindow"), Some(50.0));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_model_params.json");
        std::fs::write(path, "not json").unwrap();

        let err = ModelParams::load(dir.path(), "bad").unwrap_err();
        assert!(matches!(err, StreamError::InvalidParams(_)));
    }

    #[test]
    fn test_from_value() {
        let params = ModelParams::from_value("demo", json!({"predictedField": "class"}));
        assert_eq!(params.dataset(), "demo");
        assert_eq!(params.predicted_field(), Some("class"));
        assert!(params.get("missing").is_none());
    }
}
