use thiserror::Error;

use crate::shared::embedding::Embedding;

/// Declared scorer failures: the image was readable but did not contain
/// exactly one usable face.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("{0}")]
    NotDetected(String),
    #[error("Multiple faces detected ({0}). Please ensure only one person is in frame.")]
    MultipleFaces(usize),
}

/// One scored image. Scores are in `[0, 1]`; a higher `mask_score` means a
/// covering is more likely.
#[derive(Clone, Debug, PartialEq)]
pub struct Capture {
    pub detected: bool,
    pub face_count: usize,
    pub quality: f64,
    pub liveness: f64,
    pub mask_score: f64,
    pub embedding: Embedding,
    /// Scorer explanation when `detected` is false.
    pub detail: Option<String>,
}

impl Capture {
    pub fn single_face(quality: f64, liveness: f64, mask_score: f64, embedding: Embedding) -> Self {
        Self {
            detected: true,
            face_count: 1,
            quality,
            liveness,
            mask_score,
            embedding,
            detail: None,
        }
    }

    pub fn undetected(face_count: usize, detail: impl Into<String>) -> Self {
        Self {
            detected: false,
            face_count,
            quality: 0.0,
            liveness: 0.0,
            mask_score: 0.0,
            embedding: Embedding::new(Vec::new()),
            detail: Some(detail.into()),
        }
    }
}

impl From<ScoreError> for Capture {
    fn from(err: ScoreError) -> Self {
        let face_count = match err {
            ScoreError::NotDetected(_) => 0,
            ScoreError::MultipleFaces(count) => count,
        };
        Capture::undetected(face_count, err.to_string())
    }
}
