use crate::capture::domain::capture::{Capture, ScoreError};
use crate::shared::face_image::FaceImage;

/// Domain interface for the face model: detection, quality, liveness,
/// mask and embedding in one pass.
///
/// A single scorer is shared between concurrent enrollments and
/// verifications, hence `&self` and `Sync`. Backends holding a non-shareable
/// model session must serialize access internally.
pub trait CaptureScorer: Send + Sync {
    fn score(&self, image: &FaceImage) -> Result<Capture, ScoreError>;

    /// Short backend identifier for health reporting.
    fn backend(&self) -> &str;

    /// Whether scores come from a loaded model rather than a stand-in.
    fn is_model_backed(&self) -> bool {
        true
    }
}
