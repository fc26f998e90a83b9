use serde::{Deserialize, Serialize};

/// Fixed-length identity signature produced by the capture scorer.
///
/// Values are stored as `f32` as emitted by the model; norms and products
/// are accumulated in `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt()
    }

    /// A zero-norm embedding carries no direction and never matches anything.
    pub fn is_degenerate(&self) -> bool {
        self.norm() == 0.0
    }

    /// Returns the unit-length copy, or an unchanged copy when the norm is zero.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        Self(self.0.iter().map(|&x| (f64::from(x) / norm) as f32).collect())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_of_3_4_is_5() {
        let e = Embedding::new(vec![3.0, 4.0]);
        assert_relative_eq!(e.norm(), 5.0);
    }

    #[test]
    fn test_normalized_has_unit_norm() {
        let e = Embedding::new(vec![3.0, 4.0]).normalized();
        assert_relative_eq!(e.as_slice()[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(e.as_slice()[1], 0.8, epsilon = 1e-6);
        assert_relative_eq!(e.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_vector_left_unnormalized() {
        let e = Embedding::zeros(4);
        assert!(e.is_degenerate());
        assert_eq!(e.normalized(), e);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let e = Embedding::new(vec![0.5, -0.25]);
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, "[0.5,-0.25]");
        let back: Embedding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
