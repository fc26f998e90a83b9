use std::sync::Arc;

use thiserror::Error;

use crate::biometrics::domain::capture_gate::{CaptureGate, GateError, GateMode};
use crate::biometrics::domain::similarity_decider::{decide, score};
use crate::capture::domain::capture::Capture;
use crate::capture::domain::capture_scorer::CaptureScorer;
use crate::capture::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::pipeline::verification_decision::{DecisionReason, VerificationDecision};
use crate::shared::auth_config::AuthConfig;
use crate::shared::constants::EMBEDDING_DIM;
use crate::shared::embedding::Embedding;

/// Malformed verification requests. Biometric outcomes are never errors;
/// they come back as a [`VerificationDecision`].
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Invalid image: {0}")]
    Decode(#[from] DecodeError),
    #[error("stored embedding is empty")]
    EmptyTemplate,
    #[error("stored embedding has {found} values, expected {expected}")]
    TemplateDimensionMismatch { expected: usize, found: usize },
    #[error("scorer returned a {found}-dimensional embedding, expected {expected}")]
    InvalidEmbedding { expected: usize, found: usize },
}

impl VerificationError {
    /// Malformed request, as opposed to a scorer fault.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, VerificationError::InvalidEmbedding { .. })
    }
}

/// Single-image verification: decode → score → liveness gate → similarity
/// against the caller's stored embedding → threshold.
pub struct VerifyFaceUseCase {
    decoder: Box<dyn ImageDecoder>,
    scorer: Arc<dyn CaptureScorer>,
    gate: CaptureGate,
    threshold: f64,
}

impl VerifyFaceUseCase {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        scorer: Arc<dyn CaptureScorer>,
        config: AuthConfig,
    ) -> Self {
        Self {
            decoder,
            scorer,
            gate: CaptureGate::new(&config),
            threshold: config.similarity_threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn execute(
        &self,
        image: &[u8],
        stored: &Embedding,
    ) -> Result<VerificationDecision, VerificationError> {
        if stored.is_empty() {
            return Err(VerificationError::EmptyTemplate);
        }
        if stored.len() != EMBEDDING_DIM {
            return Err(VerificationError::TemplateDimensionMismatch {
                expected: EMBEDDING_DIM,
                found: stored.len(),
            });
        }

        let image = self.decoder.decode(image)?;
        let capture = self.scorer.score(&image).unwrap_or_else(Capture::from);

        if let Err(err) = self.gate.evaluate(&capture, GateMode::Verification) {
            return Ok(self.reject(&capture, &err));
        }

        if capture.embedding.len() != EMBEDDING_DIM {
            log::error!(
                "Scorer returned a {}-dimensional embedding",
                capture.embedding.len()
            );
            return Err(VerificationError::InvalidEmbedding {
                expected: EMBEDDING_DIM,
                found: capture.embedding.len(),
            });
        }

        let similarity = score(&capture.embedding, stored);
        let verified = decide(similarity, self.threshold);
        log::info!(
            "Face verification: similarity={similarity:.3}, threshold={}",
            self.threshold
        );

        Ok(VerificationDecision {
            verified,
            similarity,
            liveness_score: capture.liveness,
            threshold: self.threshold,
            reason: if verified {
                DecisionReason::Matched
            } else {
                DecisionReason::BelowThreshold
            },
        })
    }

    fn reject(&self, capture: &Capture, err: &GateError) -> VerificationDecision {
        // Past detection, verification mode only runs the liveness gate.
        let (reason, liveness) = match err {
            GateError::NoFaceDetected(_) => (DecisionReason::NoFace, 0.0),
            GateError::MultipleFacesDetected(_) => (DecisionReason::MultipleFaces, 0.0),
            _ => (DecisionReason::LivenessFailed, capture.liveness),
        };
        log::warn!("Face verification rejected: {err}");
        VerificationDecision::rejected(reason, liveness, self.threshold)
    }
}
