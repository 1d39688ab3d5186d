//! Veracity Core
//!
//! Core types and error handling shared across Veracity components.
//!
//! This crate provides:
//! - The error taxonomy used by the inference pipeline
//! - Domain types for encoded sequences, scores, labels and decisions

pub mod error;
pub mod types;

pub use error::{Artifact, Error, Result};
pub use types::{round_percent, Decision, EncodedSequence, Label, Score, DECISION_THRESHOLD};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Artifact, Error, Result};
    pub use crate::types::{Decision, EncodedSequence, Label, Score};
}
