//! Artifact loading
//!
//! Resolves artifact files from a local directory or the Hugging Face Hub,
//! loads metadata, vocabulary and classifier once, and cross-checks them.
//! Any failure here is a startup error.

use crate::config::{ArtifactConfig, ArtifactSource, DeviceSpec, VocabularyFormat};
use crate::gru::{GruArchitecture, GruClassifier};
use crate::metadata::ModelMetadata;
use crate::pretrained::PretrainedTokenizerVocabulary;
use crate::vocabulary::{Vocabulary, WordIndexVocabulary};
use crate::SequenceClassifier;
use candle_core::Device;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use veracity_core::{Artifact, Error, Result};

/// Concrete locations of every artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub vocabulary: PathBuf,
    pub metadata: PathBuf,
    pub weights: PathBuf,
    pub architecture: PathBuf,
}

impl ResolvedPaths {
    /// Resolve file locations, downloading from the Hub when configured
    pub fn resolve(config: &ArtifactConfig) -> Result<Self> {
        match &config.source {
            ArtifactSource::Local { path } => Ok(Self {
                vocabulary: path.join(&config.files.vocabulary),
                metadata: path.join(&config.files.metadata),
                weights: path.join(&config.files.weights),
                architecture: path.join(&config.files.architecture),
            }),
            ArtifactSource::HuggingFace { repo, revision } => {
                resolve_from_hub(config, repo, revision)
            }
        }
    }
}

#[cfg(feature = "hf-hub")]
fn resolve_from_hub(config: &ArtifactConfig, repo: &str, revision: &str) -> Result<ResolvedPaths> {
    use hf_hub::api::sync::ApiBuilder;
    use hf_hub::{Repo, RepoType};

    info!("Fetching artifacts from HuggingFace: {} @ {}", repo, revision);

    let mut builder = ApiBuilder::new();
    if let Some(cache_dir) = dirs::cache_dir() {
        builder = builder.with_cache_dir(cache_dir.join("veracity").join("hub"));
    }
    let api = builder.build().map_err(|e| {
        Error::config(format!("Failed to initialize HuggingFace API: {}", e))
    })?;

    let repo_obj = api.repo(Repo::with_revision(
        repo.to_string(),
        RepoType::Model,
        revision.to_string(),
    ));

    let fetch = |file: &Path, artifact: Artifact| -> Result<PathBuf> {
        let name = file.to_string_lossy();
        debug!("Downloading {}", name);
        repo_obj.get(&name).map_err(|e| {
            Error::startup_load(artifact, format!("Failed to download {}: {}", name, e))
        })
    };

    Ok(ResolvedPaths {
        vocabulary: fetch(&config.files.vocabulary, Artifact::Vocabulary)?,
        metadata: fetch(&config.files.metadata, Artifact::Metadata)?,
        weights: fetch(&config.files.weights, Artifact::Classifier)?,
        architecture: fetch(&config.files.architecture, Artifact::Classifier)?,
    })
}

#[cfg(not(feature = "hf-hub"))]
fn resolve_from_hub(_config: &ArtifactConfig, repo: &str, _revision: &str) -> Result<ResolvedPaths> {
    Err(Error::config(format!(
        "HuggingFace source '{}' requires the 'hf-hub' feature",
        repo
    )))
}

/// Create Candle device from device spec
pub fn create_device(spec: DeviceSpec) -> Result<Device> {
    match spec {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda => Device::new_cuda(0).map_err(|e| {
            Error::startup_load(
                Artifact::Classifier,
                format!("Failed to create CUDA device: {}", e),
            )
        }),
        DeviceSpec::Metal => Device::new_metal(0).map_err(|e| {
            Error::startup_load(
                Artifact::Classifier,
                format!("Failed to create Metal device: {}", e),
            )
        }),
    }
}

/// Load the vocabulary in the configured format
pub fn load_vocabulary(config: &ArtifactConfig, path: &Path) -> Result<Arc<dyn Vocabulary>> {
    if !path.exists() {
        return Err(Error::startup_load(
            Artifact::Vocabulary,
            format!("file not found: {}", path.display()),
        ));
    }

    let vocabulary: Arc<dyn Vocabulary> = match config.vocabulary.format {
        VocabularyFormat::WordIndex => Arc::new(WordIndexVocabulary::from_file(path)?),
        VocabularyFormat::PretrainedTokenizer => Arc::new(PretrainedTokenizerVocabulary::from_file(
            path,
            config.vocabulary.unk_token.clone(),
        )?),
    };

    info!(
        "Loaded vocabulary from {} ({} tokens, OOV id {})",
        path.display(),
        vocabulary.len(),
        vocabulary.oov_id()
    );
    Ok(vocabulary)
}

/// All frozen artifacts, loaded once and shared read-only
pub struct LoadedArtifacts {
    pub metadata: ModelMetadata,
    pub vocabulary: Arc<dyn Vocabulary>,
    pub classifier: Arc<dyn SequenceClassifier>,
}

impl LoadedArtifacts {
    /// Load every artifact described by the configuration
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        let paths = ResolvedPaths::resolve(config)?;
        Self::load_paths(config, &paths)
    }

    /// Load artifacts from already-resolved paths
    pub fn load_paths(config: &ArtifactConfig, paths: &ResolvedPaths) -> Result<Self> {
        let metadata = ModelMetadata::from_file(&paths.metadata)?;
        info!(
            "Loaded metadata from {} (max_length={})",
            paths.metadata.display(),
            metadata.max_length
        );

        let vocabulary = load_vocabulary(config, &paths.vocabulary)?;

        let architecture = GruArchitecture::from_file(&paths.architecture)?;
        if let Some(expected) = metadata.vocab_size {
            if expected != architecture.vocab_size {
                return Err(Error::startup_load(
                    Artifact::Classifier,
                    format!(
                        "embedding table has {} rows but metadata declares vocab_size {}",
                        architecture.vocab_size, expected
                    ),
                ));
            }
        }

        let max_id = vocabulary.max_id();
        if max_id as usize >= architecture.vocab_size {
            return Err(Error::startup_load(
                Artifact::Vocabulary,
                format!(
                    "vocabulary emits IDs up to {} but the embedding table has {} rows",
                    max_id, architecture.vocab_size
                ),
            ));
        }

        let device = create_device(config.inference.device)?;
        let name = metadata.model_name.clone().unwrap_or_else(|| config.name.clone());
        let classifier = GruClassifier::load(name, &paths.weights, architecture, device)?;

        Ok(Self {
            metadata,
            vocabulary,
            classifier: Arc::new(classifier),
        })
    }
}
