//! Fake news detector: text in, decision out
//!
//! Wires the vocabulary, sequence normalizer, classifier and decision engine
//! into one synchronous call. All collaborators are injected and shared
//! read-only, so a single detector can serve any number of callers.

use crate::classifier::SequenceClassifier;
use crate::config::ArtifactConfig;
use crate::decision::decide;
use crate::model_loader::LoadedArtifacts;
use crate::sequence::SequenceNormalizer;
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use veracity_core::{Artifact, Decision, EncodedSequence, Error, Result, Score};

/// Decision plus details about how the input was encoded
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// The labelled outcome
    #[serde(flatten)]
    pub decision: Decision,

    /// Tokens found in the input
    pub token_count: usize,

    /// Tokens that mapped to the OOV ID
    pub oov_count: usize,

    /// Whether leading tokens were dropped to fit `max_length`
    pub truncated: bool,

    /// Latency in microseconds
    pub latency_us: u64,
}

/// REAL/FAKE classifier over raw text
pub struct FakeNewsDetector {
    vocabulary: Arc<dyn Vocabulary>,
    normalizer: SequenceNormalizer,
    classifier: Arc<dyn SequenceClassifier>,
}

impl FakeNewsDetector {
    /// Assemble a detector from loaded collaborators.
    ///
    /// Fails when the classifier declares an input width different from the
    /// normalizer's `max_length`.
    pub fn new(
        vocabulary: Arc<dyn Vocabulary>,
        normalizer: SequenceNormalizer,
        classifier: Arc<dyn SequenceClassifier>,
    ) -> Result<Self> {
        if let Some(expected) = classifier.input_length() {
            if expected != normalizer.max_length() {
                return Err(Error::startup_load(
                    Artifact::Classifier,
                    format!(
                        "classifier '{}' expects {} input IDs but metadata max_length is {}",
                        classifier.name(),
                        expected,
                        normalizer.max_length()
                    ),
                ));
            }
        }

        Ok(Self {
            vocabulary,
            normalizer,
            classifier,
        })
    }

    /// Load every artifact and build the detector
    pub fn from_artifacts(config: &ArtifactConfig) -> Result<Self> {
        let artifacts = LoadedArtifacts::load(config)?;
        let detector = Self::from_loaded(artifacts)?;
        info!(
            "Fake news detector ready: classifier '{}', max_length {}",
            detector.classifier.name(),
            detector.max_length()
        );
        Ok(detector)
    }

    /// Build the detector from already-loaded artifacts
    pub fn from_loaded(artifacts: LoadedArtifacts) -> Result<Self> {
        let normalizer = SequenceNormalizer::new(artifacts.metadata.max_length)?;
        Self::new(artifacts.vocabulary, normalizer, artifacts.classifier)
    }

    /// Fixed input width
    pub fn max_length(&self) -> usize {
        self.normalizer.max_length()
    }

    /// The loaded vocabulary
    pub fn vocabulary(&self) -> &dyn Vocabulary {
        self.vocabulary.as_ref()
    }

    /// Name of the loaded classifier
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Encode text and coerce it to exactly `max_length` IDs
    pub fn encode_and_normalize(&self, text: &str) -> Result<EncodedSequence> {
        let encoded = self.vocabulary.encode(text)?;
        Ok(self.normalizer.normalize(&encoded))
    }

    /// Classify text as REAL or FAKE.
    ///
    /// Blank input is rejected with [`Error::EmptyInput`] before anything is
    /// encoded or scored.
    pub fn classify(&self, text: &str) -> Result<Decision> {
        self.detect(text).map(|detection| detection.decision)
    }

    /// Classify text and report encoding details
    pub fn detect(&self, text: &str) -> Result<Detection> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let start = Instant::now();

        let encoded = self.vocabulary.encode(text)?;
        let oov_id = self.vocabulary.oov_id();
        let token_count = encoded.len();
        let oov_count = encoded.as_slice().iter().filter(|&&id| id == oov_id).count();
        let truncated = self.normalizer.truncates(&encoded);

        let normalized = self.normalizer.normalize(&encoded);
        let raw = self.classifier.score(normalized.as_slice())?;
        let score = Score::new(raw)?;
        let decision = decide(score);

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            token_count,
            oov_count,
            truncated,
            score = raw,
            label = %decision.label(),
            latency_us,
            "classified text"
        );

        Ok(Detection {
            decision,
            token_count,
            oov_count,
            truncated,
            latency_us,
        })
    }
}
