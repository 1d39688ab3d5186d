//! Fixed-width sequence normalization
//!
//! Both truncation and padding happen at the front: long sequences keep
//! their trailing `max_length` IDs and short sequences are left-padded with
//! [`PAD_ID`], matching the convention the classifier was trained with.

use veracity_core::{Artifact, EncodedSequence, Error, Result};

/// ID used for padding
pub const PAD_ID: u32 = 0;

/// Coerces encoded sequences to exactly `max_length` IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceNormalizer {
    max_length: usize,
}

impl SequenceNormalizer {
    /// Create a normalizer; `max_length` must be positive
    pub fn new(max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(Error::startup_load(
                Artifact::Metadata,
                "max_length must be a positive integer",
            ));
        }
        Ok(Self { max_length })
    }

    /// Output width
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Truncate from the front or left-pad with zeros
    pub fn normalize(&self, sequence: &EncodedSequence) -> EncodedSequence {
        let ids = sequence.as_slice();

        let normalized = if ids.len() >= self.max_length {
            ids[ids.len() - self.max_length..].to_vec()
        } else {
            let mut padded = vec![PAD_ID; self.max_length - ids.len()];
            padded.extend_from_slice(ids);
            padded
        };

        EncodedSequence::new(normalized)
    }

    /// Whether `normalize` would drop IDs from this sequence
    pub fn truncates(&self, sequence: &EncodedSequence) -> bool {
        sequence.len() > self.max_length
    }
}
