use serde::Serialize;

use crate::shared::embedding::Embedding;

/// Result of a successful enrollment: the aggregated, unit-length identity
/// embedding plus the statistics it was built from.
///
/// Persisting it is the caller's concern; the core never mutates it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrollmentTemplate {
    embedding: Embedding,
    average_quality: f64,
    sample_count: usize,
}

impl EnrollmentTemplate {
    pub(crate) fn new(embedding: Embedding, average_quality: f64, sample_count: usize) -> Self {
        Self {
            embedding,
            average_quality,
            sample_count,
        }
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    pub fn into_embedding(self) -> Embedding {
        self.embedding
    }

    pub fn average_quality(&self) -> f64 {
        self.average_quality
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
