use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use veracity_classifiers::DeviceSpec;

#[derive(Parser, Debug)]
#[command(name = "veracity")]
#[command(author, version, about = "Classify news text as REAL or FAKE")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "VERACITY_CONFIG", default_value = "veracity.yaml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, env = "VERACITY_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub artifacts: ArtifactOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one piece of text
    Classify {
        /// Text to classify
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load every artifact and report what was found
    Check,

    /// Start the HTTP service
    Serve {
        /// Listen address
        #[arg(short, long, env = "VERACITY_LISTEN")]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long, env = "VERACITY_PORT")]
        port: Option<u16>,
    },
}

/// Per-flag overrides for artifact locations.
///
/// Relative file paths are resolved against the model directory.
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactOverrides {
    /// Directory holding the artifacts
    #[arg(long, global = true, env = "VERACITY_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Hugging Face Hub repository holding the artifacts
    #[arg(long, global = true, env = "VERACITY_HF_REPO", conflicts_with = "model_dir")]
    pub hf_repo: Option<String>,

    /// Vocabulary file
    #[arg(long, global = true, env = "VERACITY_VOCABULARY")]
    pub vocabulary: Option<PathBuf>,

    /// Metadata file
    #[arg(long, global = true, env = "VERACITY_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Classifier weights (safetensors)
    #[arg(long, global = true, env = "VERACITY_WEIGHTS")]
    pub weights: Option<PathBuf>,

    /// Classifier architecture file
    #[arg(long, global = true, env = "VERACITY_ARCHITECTURE")]
    pub architecture: Option<PathBuf>,

    /// Inference device: cpu, cuda or metal
    #[arg(long, global = true, env = "VERACITY_DEVICE")]
    pub device: Option<DeviceSpec>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}
