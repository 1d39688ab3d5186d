//! Classifier trait

use veracity_core::Result;

/// Frozen binary scoring function over fixed-width ID sequences.
///
/// Implementations are loaded once and shared read-only; `score` must not
/// mutate any state that affects later calls.
pub trait SequenceClassifier: Send + Sync {
    /// Raw P(REAL) for one normalized sequence.
    ///
    /// The value is returned unvalidated; callers check it against [0, 1].
    fn score(&self, ids: &[u32]) -> Result<f32>;

    /// Input width the artifact was built for, when it declares one
    fn input_length(&self) -> Option<usize>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
