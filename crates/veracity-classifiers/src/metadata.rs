//! Model metadata artifact

use serde::{Deserialize, Serialize};
use std::path::Path;
use veracity_core::{Artifact, Error, Result};

/// Read-only record describing the trained model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Fixed input width the classifier was trained on
    #[serde(alias = "MAX_LEN")]
    pub max_length: usize,

    /// Model name or version
    #[serde(default, alias = "MODEL_NAME", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Vocabulary size the embedding layer was built for
    #[serde(default, alias = "VOCAB_SIZE", skip_serializing_if = "Option::is_none")]
    pub vocab_size: Option<usize>,
}

impl ModelMetadata {
    /// Create metadata with only a sequence length
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            model_name: None,
            vocab_size: None,
        }
    }

    /// Load metadata from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::startup_load(
                Artifact::Metadata,
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate metadata JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let metadata: Self = serde_json::from_str(json).map_err(|e| {
            Error::startup_load(Artifact::Metadata, format!("invalid metadata JSON: {}", e))
        })?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Check invariants
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(Error::startup_load(
                Artifact::Metadata,
                "max_length must be a positive integer",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upper_case_keys() {
        let metadata = ModelMetadata::from_json_str(r#"{"MAX_LEN": 300, "VOCAB_SIZE": 20000}"#).unwrap();
        assert_eq!(metadata.max_length, 300);
        assert_eq!(metadata.vocab_size, Some(20000));
        assert_eq!(metadata.model_name, None);
    }

    #[test]
    fn test_parse_snake_case_keys() {
        let metadata =
            ModelMetadata::from_json_str(r#"{"max_length": 64, "model_name": "gru-v2"}"#).unwrap();
        assert_eq!(metadata.max_length, 64);
        assert_eq!(metadata.model_name.as_deref(), Some("gru-v2"));
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let err = ModelMetadata::from_json_str(r#"{"MAX_LEN": 0}"#).unwrap_err();
        assert!(err.is_startup());
    }

    #[test]
    fn test_missing_max_length_is_rejected() {
        let err = ModelMetadata::from_json_str(r#"{"model_name": "gru"}"#).unwrap_err();
        assert!(err.to_string().contains("metadata"));
    }

    #[test]
    fn test_negative_max_length_is_rejected() {
        assert!(ModelMetadata::from_json_str(r#"{"MAX_LEN": -5}"#).is_err());
    }
}
