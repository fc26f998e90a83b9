//! Multi-sample template construction.
//!
//! Embeddings are averaged in the raw model space and the mean is then
//! projected onto the unit sphere. Normalizing first would let per-sample
//! magnitude differences skew the mean direction.

use ndarray::{Array1, ArrayView1};
use thiserror::Error;

use crate::shared::embedding::Embedding;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("no embeddings provided")]
    EmptyInput,
    #[error("embedding {index} has {found} values, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Element-wise mean of `embeddings`, L2-normalized.
///
/// A zero mean is returned unnormalized. The result does not depend on the
/// order of the inputs beyond floating-point rounding.
pub fn aggregate(embeddings: &[Embedding]) -> Result<Embedding, AggregateError> {
    let first = embeddings.first().ok_or(AggregateError::EmptyInput)?;
    let dim = first.len();

    let mut sum = Array1::<f64>::zeros(dim);
    for (index, embedding) in embeddings.iter().enumerate() {
        if embedding.len() != dim {
            return Err(AggregateError::DimensionMismatch {
                index,
                expected: dim,
                found: embedding.len(),
            });
        }
        sum += &ArrayView1::from(embedding.as_slice()).mapv(f64::from);
    }

    let mean = sum / embeddings.len() as f64;
    let norm = mean.dot(&mean).sqrt();
    let values = if norm > 0.0 { mean / norm } else { mean };
    Ok(Embedding::new(values.iter().map(|&v| v as f32).collect()))
}
