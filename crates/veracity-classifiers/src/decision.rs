//! Decision engine: score to label

use veracity_core::{Decision, Label, Score, DECISION_THRESHOLD};

/// Label a score. The boundary is inclusive for REAL and compared at full
/// precision.
pub fn label_for(score: Score) -> Label {
    if score.value() >= DECISION_THRESHOLD {
        Label::Real
    } else {
        Label::Fake
    }
}

/// Turn a validated score into a decision with complementary confidences
pub fn decide(score: Score) -> Decision {
    Decision::new(label_for(score), score)
}
