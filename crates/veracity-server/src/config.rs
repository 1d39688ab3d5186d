//! Application configuration
//!
//! ```yaml
//! artifacts:
//!   source:
//!     type: local
//!     path: ./models/gru
//! server:
//!   listen: 0.0.0.0
//!   port: 8080
//! ```

use crate::cli::ArtifactOverrides;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use veracity_classifiers::{ArtifactConfig, ArtifactSource};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the frozen artifacts live
    #[serde(default)]
    pub artifacts: ArtifactConfig,

    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from file and apply CLI overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(config_path: &Path, overrides: &ArtifactOverrides) -> anyhow::Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Apply per-flag overrides on top of file values
    pub fn apply_overrides(&mut self, overrides: &ArtifactOverrides) {
        let artifacts = &mut self.artifacts;

        if let Some(dir) = &overrides.model_dir {
            artifacts.source = ArtifactSource::Local { path: dir.clone() };
        }
        if let Some(repo) = &overrides.hf_repo {
            artifacts.source = ArtifactSource::HuggingFace {
                repo: repo.clone(),
                revision: "main".to_string(),
            };
        }
        if let Some(path) = &overrides.vocabulary {
            artifacts.files.vocabulary = path.clone();
        }
        if let Some(path) = &overrides.metadata {
            artifacts.files.metadata = path.clone();
        }
        if let Some(path) = &overrides.weights {
            artifacts.files.weights = path.clone();
        }
        if let Some(path) = &overrides.architecture {
            artifacts.files.architecture = path.clone();
        }
        if let Some(device) = overrides.device {
            artifacts.inference.device = device;
        }
    }
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Allow cross-origin requests
    #[serde(default)]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            cors: false,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use veracity_classifiers::{DeviceSpec, VocabularyFormat};

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(
            Path::new("/nonexistent/veracity.yaml"),
            &ArtifactOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.listen, "0.0.0.0");
        assert_eq!(config.artifacts.source, ArtifactSource::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veracity.yaml");
        std::fs::write(
            &path,
            r#"
artifacts:
  source:
    type: local
    path: /srv/models/gru
  vocabulary:
    format: pretrained-tokenizer
server:
  port: 9090
  cors: true
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path, &ArtifactOverrides::default()).unwrap();
        assert_eq!(
            config.artifacts.source,
            ArtifactSource::Local {
                path: PathBuf::from("/srv/models/gru")
            }
        );
        assert_eq!(
            config.artifacts.vocabulary.format,
            VocabularyFormat::PretrainedTokenizer
        );
        assert_eq!(config.server.port, 9090);
        assert!(config.server.cors);
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veracity.yaml");
        std::fs::write(&path, "server: [not, a, map").unwrap();

        assert!(AppConfig::load(&path, &ArtifactOverrides::default()).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = AppConfig::default();
        config.apply_overrides(&ArtifactOverrides {
            model_dir: Some(PathBuf::from("/opt/gru")),
            weights: Some(PathBuf::from("gru-v2.safetensors")),
            device: Some(DeviceSpec::Cuda),
            ..Default::default()
        });

        assert_eq!(
            config.artifacts.source,
            ArtifactSource::Local {
                path: PathBuf::from("/opt/gru")
            }
        );
        assert_eq!(
            config.artifacts.files.weights,
            PathBuf::from("gru-v2.safetensors")
        );
        assert_eq!(config.artifacts.files.vocabulary, PathBuf::from("vocabulary.json"));
        assert_eq!(config.artifacts.inference.device, DeviceSpec::Cuda);
    }

    #[test]
    fn test_hf_repo_override() {
        let mut config = AppConfig::default();
        config.apply_overrides(&ArtifactOverrides {
            hf_repo: Some("veracity/gru-fake-news".to_string()),
            ..Default::default()
        });

        assert!(matches!(
            config.artifacts.source,
            ArtifactSource::HuggingFace { ref repo, .. } if repo == "veracity/gru-fake-news"
        ));
    }
}
