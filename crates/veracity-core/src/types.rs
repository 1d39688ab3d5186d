//! Core types for Veracity

use crate::error::{Error, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Probability at or above which a text is labelled REAL
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Ordered token IDs produced by a vocabulary, optionally normalized to a
/// fixed width. ID 0 is reserved for padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedSequence(Vec<u32>);

impl EncodedSequence {
    /// Create an encoded sequence from token IDs
    pub fn new(ids: Vec<u32>) -> Self {
        Self(ids)
    }

    /// Number of IDs in the sequence
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence holds no IDs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the IDs
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Take ownership of the IDs
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }

    /// Number of padding (zero) IDs
    pub fn padding_len(&self) -> usize {
        self.0.iter().filter(|&&id| id == 0).count()
    }
}

impl From<Vec<u32>> for EncodedSequence {
    fn from(ids: Vec<u32>) -> Self {
        Self(ids)
    }
}

impl AsRef<[u32]> for EncodedSequence {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

/// The classifier's estimate of P(REAL), guaranteed to lie in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f32);

impl Score {
    /// Validate a raw classifier output.
    ///
    /// Values outside [0, 1] (and NaN) are rejected, never clamped.
    pub fn new(raw: f32) -> Result<Self> {
        if (0.0..=1.0).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(Error::InferenceContract(raw))
        }
    }

    /// Full-precision probability that the text is REAL
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for Score {
    type Error = Error;

    fn try_from(raw: f32) -> Result<Self> {
        Self::new(raw)
    }
}

/// Binary verdict for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Real,
    Fake,
}

impl Label {
    /// Upper-case name as shown to users
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labelled outcome of one classification with complementary confidences.
///
/// Confidences are derived from the score on demand, so
/// `real_confidence + fake_confidence == 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    label: Label,
    score: Score,
}

impl Decision {
    /// Create a decision from a label and the score it was derived from
    pub fn new(label: Label, score: Score) -> Self {
        Self { label, score }
    }

    /// The verdict
    pub fn label(&self) -> Label {
        self.label
    }

    /// The underlying full-precision score
    pub fn score(&self) -> Score {
        self.score
    }

    /// Confidence that the text is REAL, in [0, 1]
    pub fn real_confidence(&self) -> f64 {
        f64::from(self.score.value())
    }

    /// Confidence that the text is FAKE, in [0, 1]
    pub fn fake_confidence(&self) -> f64 {
        1.0 - self.real_confidence()
    }

    /// REAL confidence as a percentage in [0, 100]
    pub fn real_percent(&self) -> f64 {
        self.real_confidence() * 100.0
    }

    /// FAKE confidence as a percentage in [0, 100]
    pub fn fake_percent(&self) -> f64 {
        self.fake_confidence() * 100.0
    }
}

/// Round a percentage to two decimal places for presentation
pub fn round_percent(percent: f64) -> f64 {
    (percent * 100.0).round() / 100.0
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (REAL: {:.2}%, FAKE: {:.2}%)",
            self.label,
            self.real_percent(),
            self.fake_percent()
        )
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Decision", 3)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("real_confidence", &round_percent(self.real_percent()))?;
        state.serialize_field("fake_confidence", &round_percent(self.fake_percent()))?;
        state.end()
    }
}
