//! Artifact configuration
//!
//! Describes where the frozen vocabulary, metadata and classifier artifacts
//! live and how to load them. Usually embedded in the server's YAML config:
//!
//! ```yaml
//! artifacts:
//!   name: gru-fake-news
//!   source:
//!     type: local
//!     path: ./models/gru
//!   files:
//!     vocabulary: vocabulary.json
//!     metadata: model_metadata.json
//!     weights: model.safetensors
//!     architecture: config.json
//!   vocabulary:
//!     format: word-index
//!   inference:
//!     device: cpu
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use veracity_core::{Error, Result};

/// Configuration for loading all frozen artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Model name used in logs
    #[serde(default = "default_name")]
    pub name: String,

    /// Where the artifact files are read from
    #[serde(default)]
    pub source: ArtifactSource,

    /// File names, relative to the source
    #[serde(default)]
    pub files: ArtifactFiles,

    /// Vocabulary format settings
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            source: ArtifactSource::default(),
            files: ArtifactFiles::default(),
            vocabulary: VocabularyConfig::default(),
            inference: InferenceConfig::default(),
        }
    }
}

fn default_name() -> String {
    "gru-fake-news".to_string()
}

impl ArtifactConfig {
    /// Use artifacts from a local directory
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ArtifactSource::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// Use artifacts from a Hugging Face Hub repository
    pub fn from_hf(repo: impl Into<String>) -> Self {
        Self {
            source: ArtifactSource::HuggingFace {
                repo: repo.into(),
                revision: default_revision(),
            },
            ..Default::default()
        }
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| {
            Error::config(format!("invalid artifact config {}: {}", path.display(), e))
        })
    }

    /// Set device
    pub fn with_device(mut self, device: DeviceSpec) -> Self {
        self.inference.device = device;
        self
    }

    /// Set vocabulary format
    pub fn with_vocabulary_format(mut self, format: VocabularyFormat) -> Self {
        self.vocabulary.format = format;
        self
    }
}

/// Artifact source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactSource {
    /// Local directory
    Local { path: PathBuf },

    /// Download from Hugging Face Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ArtifactSource {
    fn default() -> Self {
        Self::Local {
            path: PathBuf::from("./models"),
        }
    }
}

fn default_revision() -> String {
    "main".to_string()
}

/// Artifact file names. Absolute paths override the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFiles {
    #[serde(default = "default_vocabulary_file")]
    pub vocabulary: PathBuf,

    #[serde(default = "default_metadata_file")]
    pub metadata: PathBuf,

    #[serde(default = "default_weights_file")]
    pub weights: PathBuf,

    #[serde(default = "default_architecture_file")]
    pub architecture: PathBuf,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary_file(),
            metadata: default_metadata_file(),
            weights: default_weights_file(),
            architecture: default_architecture_file(),
        }
    }
}

fn default_vocabulary_file() -> PathBuf {
    PathBuf::from("vocabulary.json")
}

fn default_metadata_file() -> PathBuf {
    PathBuf::from("model_metadata.json")
}

fn default_weights_file() -> PathBuf {
    PathBuf::from("model.safetensors")
}

fn default_architecture_file() -> PathBuf {
    PathBuf::from("config.json")
}

/// Vocabulary artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabularyFormat {
    /// Word index with splitting policy and OOV token
    #[default]
    WordIndex,

    /// Hugging Face `tokenizer.json`
    PretrainedTokenizer,
}

/// Vocabulary settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub format: VocabularyFormat,

    /// Unknown token for pretrained tokenizers
    #[serde(default = "default_unk_token")]
    pub unk_token: String,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            format: VocabularyFormat::default(),
            unk_token: default_unk_token(),
        }
    }
}

fn default_unk_token() -> String {
    "[UNK]".to_string()
}

/// Inference configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on
    #[serde(default)]
    pub device: DeviceSpec,
}

/// Device to run inference on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU 0
    Cuda,
    /// Metal (Apple Silicon)
    Metal,
}

impl std::str::FromStr for DeviceSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda),
            "metal" | "mps" => Ok(Self::Metal),
            other => Err(format!("unknown device '{}' (expected cpu, cuda or metal)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let yaml = r#"
name: "gru-v1"
source:
  type: local
  path: "./models/gru"
files:
  vocabulary: "tokenizer.json"
vocabulary:
  format: pretrained-tokenizer
  unk_token: "<unk>"
inference:
  device: "cpu"
"#;

        let config: ArtifactConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "gru-v1");
        assert_eq!(
            config.source,
            ArtifactSource::Local {
                path: PathBuf::from("./models/gru")
            }
        );
        assert_eq!(config.files.vocabulary, PathBuf::from("tokenizer.json"));
        assert_eq!(config.files.weights, PathBuf::from("model.safetensors"));
        assert_eq!(config.vocabulary.format, VocabularyFormat::PretrainedTokenizer);
        assert_eq!(config.vocabulary.unk_token, "<unk>");
        assert_eq!(config.inference.device, DeviceSpec::Cpu);
    }

    #[test]
    fn test_parse_huggingface_source_defaults_revision() {
        let yaml = r#"
source:
  type: huggingface
  repo: "veracity/gru-fake-news"
"#;

        let config: ArtifactConfig = serde_yaml::from_str(yaml).unwrap();
        match &config.source {
            ArtifactSource::HuggingFace { repo, revision } => {
                assert_eq!(repo, "veracity/gru-fake-news");
                assert_eq!(revision, "main");
            }
            _ => panic!("Expected HuggingFace source"),
        }
        assert_eq!(config.vocabulary.format, VocabularyFormat::WordIndex);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ArtifactConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.name, "gru-fake-news");
        assert_eq!(config.files.metadata, PathBuf::from("model_metadata.json"));
        assert_eq!(config.source, ArtifactSource::default());
    }

    #[test]
    fn test_device_from_str() {
        assert_eq!("CPU".parse::<DeviceSpec>().unwrap(), DeviceSpec::Cpu);
        assert_eq!("mps".parse::<DeviceSpec>().unwrap(), DeviceSpec::Metal);
        assert!("tpu".parse::<DeviceSpec>().is_err());
    }
}
