use serde::Serialize;

/// Why a verification ended the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    NoFace,
    MultipleFaces,
    LivenessFailed,
    BelowThreshold,
    Matched,
}

impl DecisionReason {
    /// End-user facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            DecisionReason::NoFace => "No face detected in image",
            DecisionReason::MultipleFaces => {
                "Multiple faces detected. Please ensure only one person is in frame."
            }
            DecisionReason::LivenessFailed => {
                "Liveness check failed. Please ensure you are a real person looking at the camera."
            }
            DecisionReason::BelowThreshold => "Face verification failed. Face does not match.",
            DecisionReason::Matched => "Face verified successfully",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of one verification. Always carries the scores and the
/// threshold in effect so callers can audit the decision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerificationDecision {
    pub verified: bool,
    pub similarity: f64,
    pub liveness_score: f64,
    pub threshold: f64,
    pub reason: DecisionReason,
}

impl VerificationDecision {
    pub(crate) fn rejected(reason: DecisionReason, liveness_score: f64, threshold: f64) -> Self {
        Self {
            verified: false,
            similarity: 0.0,
            liveness_score,
            threshold,
            reason,
        }
    }
}
