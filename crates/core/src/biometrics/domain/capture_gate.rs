use thiserror::Error;

use crate::capture::domain::capture::{Capture, ScoreError};
use crate::shared::auth_config::AuthConfig;

/// Which flow a capture is being admitted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateMode {
    /// Detection, quality, liveness and mask gates.
    Enrollment,
    /// Detection and liveness gates only.
    Verification,
}

/// Names the individual check that rejected a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Detection,
    Quality,
    Liveness,
    Mask,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("{0}")]
    NoFaceDetected(String),
    #[error("Multiple faces detected ({0}). Please ensure only one person is in frame.")]
    MultipleFacesDetected(usize),
    #[error("Face quality too low ({quality:.2}). Ensure good lighting and face is clearly visible.")]
    QualityTooLow { quality: f64, min: f64 },
    #[error("Liveness check failed ({liveness:.2}). Please ensure you are a real person looking at the camera.")]
    LivenessTooLow { liveness: f64, min: f64 },
    #[error("Face mask detected ({mask_score:.2}). Please remove any face coverings for registration.")]
    MaskDetected { mask_score: f64, max: f64 },
}

impl GateError {
    pub fn gate(&self) -> Gate {
        match self {
            GateError::NoFaceDetected(_) | GateError::MultipleFacesDetected(_) => Gate::Detection,
            GateError::QualityTooLow { .. } => Gate::Quality,
            GateError::LivenessTooLow { .. } => Gate::Liveness,
            GateError::MaskDetected { .. } => Gate::Mask,
        }
    }
}

impl From<ScoreError> for GateError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::NotDetected(reason) => GateError::NoFaceDetected(reason),
            ScoreError::MultipleFaces(count) => GateError::MultipleFacesDetected(count),
        }
    }
}

const NO_FACE_MESSAGE: &str = "No face detected in image";

/// Pass/fail policy over a single capture's scores.
#[derive(Clone, Copy, Debug)]
pub struct CaptureGate {
    min_quality: f64,
    min_liveness: f64,
    max_mask: f64,
}

impl CaptureGate {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_quality: config.min_quality,
            min_liveness: config.min_liveness,
            max_mask: config.max_mask,
        }
    }

    /// Runs the gates for `mode` in order: detection, quality, liveness, mask.
    ///
    /// Liveness runs in every mode. Quality and mask only apply to
    /// enrollment so the stored template is neither blurry nor occluded.
    pub fn evaluate(&self, capture: &Capture, mode: GateMode) -> Result<(), GateError> {
        if capture.face_count > 1 {
            return Err(GateError::MultipleFacesDetected(capture.face_count));
        }
        if !capture.detected {
            let detail = capture.detail.as_deref().unwrap_or(NO_FACE_MESSAGE);
            return Err(GateError::NoFaceDetected(detail.to_string()));
        }

        // Comparisons are negated so NaN scores fail every gate.
        if mode == GateMode::Enrollment && !(capture.quality >= self.min_quality) {
            return Err(GateError::QualityTooLow {
                quality: capture.quality,
                min: self.min_quality,
            });
        }

        if !(capture.liveness >= self.min_liveness) {
            return Err(GateError::LivenessTooLow {
                liveness: capture.liveness,
                min: self.min_liveness,
            });
        }

        if mode == GateMode::Enrollment && !(capture.mask_score <= self.max_mask) {
            return Err(GateError::MaskDetected {
                mask_score: capture.mask_score,
                max: self.max_mask,
            });
        }

        Ok(())
    }
}
