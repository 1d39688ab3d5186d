//! Error types for Veracity

use std::fmt;

/// Result type alias using Veracity's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Frozen artifacts loaded once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Token to ID mapping
    Vocabulary,
    /// Model metadata (`max_length`)
    Metadata,
    /// Classifier weights and architecture
    Classifier,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vocabulary => "vocabulary",
            Self::Metadata => "metadata",
            Self::Classifier => "classifier",
        };
        f.write_str(name)
    }
}

/// Core error type for Veracity operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An artifact is missing, corrupt, or inconsistent with another one.
    /// Fatal: no classification may be served.
    #[error("failed to load {artifact}: {reason}")]
    StartupLoad { artifact: Artifact, reason: String },

    /// Blank or whitespace-only input; no prediction is performed
    #[error("no prediction performed: input text is blank")]
    EmptyInput,

    /// Classifier produced a value outside [0, 1]
    #[error("classifier returned {0}, which is not a probability in [0, 1]")]
    InferenceContract(f32),

    /// Model runtime failure (tensor construction, forward pass)
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new startup load error for the given artifact
    pub fn startup_load(artifact: Artifact, reason: impl Into<String>) -> Self {
        Self::StartupLoad {
            artifact,
            reason: reason.into(),
        }
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error happened while loading artifacts
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::StartupLoad { .. })
    }
}
