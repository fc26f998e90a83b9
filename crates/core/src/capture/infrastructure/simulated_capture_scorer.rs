use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::capture::domain::capture::{Capture, ScoreError};
use crate::capture::domain::capture_scorer::CaptureScorer;
use crate::shared::constants::EMBEDDING_DIM;
use crate::shared::embedding::Embedding;
use crate::shared::face_image::FaceImage;

/// Stand-in scorer for running without a face model.
///
/// Every image yields one face with plausible passing scores and a random
/// embedding, so flows can be exercised end to end. Identity is not
/// modelled: two captures of the same person are unrelated vectors.
pub struct SimulatedCaptureScorer {
    rng: Mutex<StdRng>,
    dim: usize,
}

impl SimulatedCaptureScorer {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence of captures for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            dim: EMBEDDING_DIM,
        }
    }
}

impl Default for SimulatedCaptureScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureScorer for SimulatedCaptureScorer {
    fn score(&self, _image: &FaceImage) -> Result<Capture, ScoreError> {
        // A poisoned RNG is still a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let quality = rng.gen_range(0.7..0.95);
        let liveness = rng.gen_range(0.8..0.99);
        let mask_score = rng.gen_range(0.0..0.2);
        let embedding: Vec<f32> = (0..self.dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Ok(Capture::single_face(
            quality,
            liveness,
            mask_score,
            Embedding::new(embedding),
        ))
    }

    fn backend(&self) -> &str {
        "simulated"
    }

    fn is_model_backed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::face_image::ChannelOrder;

    fn image() -> FaceImage {
        FaceImage::new(vec![0; 3], 1, 1, ChannelOrder::Bgr)
    }

    #[test]
    fn test_scores_fall_in_passing_ranges() {
        let scorer = SimulatedCaptureScorer::seeded(1);
        for _ in 0..50 {
            let c = scorer.score(&image()).unwrap();
            assert!(c.detected);
            assert!((0.7..0.95).contains(&c.quality));
            assert!((0.8..0.99).contains(&c.liveness));
            assert!((0.0..0.2).contains(&c.mask_score));
            assert_eq!(c.embedding.len(), EMBEDDING_DIM);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = SimulatedCaptureScorer::seeded(42);
        let b = SimulatedCaptureScorer::seeded(42);
        assert_eq!(a.score(&image()).unwrap(), b.score(&image()).unwrap());
    }

    #[test]
    fn test_reports_not_model_backed() {
        let scorer = SimulatedCaptureScorer::seeded(0);
        assert_eq!(scorer.backend(), "simulated");
        assert!(!scorer.is_model_backed());
    }
}
