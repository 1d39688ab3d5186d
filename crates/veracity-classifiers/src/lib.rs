//! Veracity Classifiers
//!
//! The REAL/FAKE inference pipeline for news text:
//! - Vocabulary encoding (word index or pretrained tokenizer)
//! - Sequence normalization to the model's fixed input width
//! - GRU scoring with Candle
//! - Thresholded decision with complementary confidences
//!
//! Artifacts are loaded once at startup; any failure there is fatal.
//! Inference is synchronous and side-effect free, so one
//! [`FakeNewsDetector`] can be shared across threads behind an `Arc`.

pub mod classifier;
pub mod config;
pub mod decision;
pub mod detector;
pub mod gru;
pub mod metadata;
pub mod model_loader;
pub mod pretrained;
pub mod sequence;
pub mod vocabulary;

pub use classifier::SequenceClassifier;
pub use config::{
    ArtifactConfig, ArtifactFiles, ArtifactSource, DeviceSpec, InferenceConfig, VocabularyConfig,
    VocabularyFormat,
};
pub use decision::{decide, label_for};
pub use detector::{Detection, FakeNewsDetector};
pub use gru::{GruArchitecture, GruClassifier};
pub use metadata::ModelMetadata;
pub use model_loader::{create_device, load_vocabulary, LoadedArtifacts, ResolvedPaths};
pub use pretrained::PretrainedTokenizerVocabulary;
pub use sequence::{SequenceNormalizer, PAD_ID};
pub use vocabulary::{TokenizationPolicy, Vocabulary, WordIndexVocabulary, DEFAULT_FILTERS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::SequenceClassifier;
    pub use crate::config::{ArtifactConfig, DeviceSpec};
    pub use crate::detector::{Detection, FakeNewsDetector};
    pub use crate::sequence::SequenceNormalizer;
    pub use crate::vocabulary::{Vocabulary, WordIndexVocabulary};
    pub use veracity_core::prelude::*;
}
