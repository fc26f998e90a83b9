use std::sync::Arc;

use thiserror::Error;

use crate::biometrics::domain::capture_gate::{CaptureGate, Gate, GateError, GateMode};
use crate::biometrics::domain::embedding_aggregator::{aggregate, AggregateError};
use crate::capture::domain::capture_scorer::CaptureScorer;
use crate::capture::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::pipeline::enrollment_template::EnrollmentTemplate;
use crate::shared::auth_config::AuthConfig;
use crate::shared::constants::{EMBEDDING_DIM, ENROLLMENT_SAMPLES};

/// Enrollment failures. Image indices are 1-based.
#[derive(Error, Debug)]
pub enum EnrollmentError {
    #[error("exactly {expected} face images are required, got {found}")]
    WrongImageCount { expected: usize, found: usize },
    #[error("Image {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: DecodeError,
    },
    #[error("Image {index}: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: GateError,
    },
    #[error("Image {index}: scorer returned a {found}-dimensional embedding, expected {expected}")]
    InvalidEmbedding {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("failed to aggregate embeddings: {0}")]
    Aggregate(#[from] AggregateError),
}

impl EnrollmentError {
    /// Malformed request: wrong image count or an undecodable image.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EnrollmentError::WrongImageCount { .. } | EnrollmentError::Decode { .. }
        )
    }

    /// A capture failed a gate. Everything that is neither this nor a
    /// caller error is a scorer fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EnrollmentError::Rejected { .. })
    }

    /// 1-based index of the offending image, if one image is to blame.
    pub fn image_index(&self) -> Option<usize> {
        match self {
            EnrollmentError::Decode { index, .. }
            | EnrollmentError::Rejected { index, .. }
            | EnrollmentError::InvalidEmbedding { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The gate that rejected a capture, for biometric rejections.
    pub fn gate(&self) -> Option<Gate> {
        match self {
            EnrollmentError::Rejected { source, .. } => Some(source.gate()),
            _ => None,
        }
    }
}

/// Enrollment pipeline: for each of the five images, decode → score → gate,
/// aborting on the first failure; then aggregate into a template.
///
/// Nothing is retained from an aborted run.
pub struct EnrollFaceUseCase {
    decoder: Box<dyn ImageDecoder>,
    scorer: Arc<dyn CaptureScorer>,
    gate: CaptureGate,
}

impl EnrollFaceUseCase {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        scorer: Arc<dyn CaptureScorer>,
        config: AuthConfig,
    ) -> Self {
        Self {
            decoder,
            scorer,
            gate: CaptureGate::new(&config),
        }
    }

    pub fn execute<P: AsRef<[u8]>>(
        &self,
        images: &[P],
    ) -> Result<EnrollmentTemplate, EnrollmentError> {
        if images.len() != ENROLLMENT_SAMPLES {
            return Err(EnrollmentError::WrongImageCount {
                expected: ENROLLMENT_SAMPLES,
                found: images.len(),
            });
        }

        let mut embeddings = Vec::with_capacity(ENROLLMENT_SAMPLES);
        let mut qualities = Vec::with_capacity(ENROLLMENT_SAMPLES);

        for (i, payload) in images.iter().enumerate() {
            let index = i + 1;
            let image = self
                .decoder
                .decode(payload.as_ref())
                .map_err(|source| EnrollmentError::Decode { index, source })?;

            let capture = self
                .scorer
                .score(&image)
                .map_err(GateError::from)
                .and_then(|capture| {
                    self.gate.evaluate(&capture, GateMode::Enrollment)?;
                    Ok(capture)
                })
                .map_err(|source| {
                    log::warn!("Enrollment rejected at image {index}: {source}");
                    EnrollmentError::Rejected { index, source }
                })?;

            if capture.embedding.len() != EMBEDDING_DIM {
                log::error!(
                    "Scorer returned a {}-dimensional embedding for image {index}",
                    capture.embedding.len()
                );
                return Err(EnrollmentError::InvalidEmbedding {
                    index,
                    expected: EMBEDDING_DIM,
                    found: capture.embedding.len(),
                });
            }

            log::info!(
                "Image {index}/{ENROLLMENT_SAMPLES}: quality={:.2}, liveness={:.2}",
                capture.quality,
                capture.liveness
            );
            qualities.push(capture.quality);
            embeddings.push(capture.embedding);
        }

        let embedding = aggregate(&embeddings)?;
        let average_quality = qualities.iter().sum::<f64>() / qualities.len() as f64;
        log::info!("Face enrollment successful. Average quality: {average_quality:.3}");

        Ok(EnrollmentTemplate::new(
            embedding,
            average_quality,
            embeddings.len(),
        ))
    }
}
