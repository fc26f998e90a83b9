use crate::shared::embedding::Embedding;

/// Cosine similarity clamped to `[0, 1]`.
///
/// Each side is divided by its own norm before the dot product, so stored
/// templates need not be unit length. A zero-norm or non-finite side scores
/// 0.0 and anti-correlated vectors collapse to 0.0.
pub fn score(a: &Embedding, b: &Embedding) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if !usable_norm(norm_a) || !usable_norm(norm_b) {
        return 0.0;
    }

    let dot: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| (f64::from(x) / norm_a) * (f64::from(y) / norm_b))
        .sum();
    if !dot.is_finite() {
        return 0.0;
    }
    dot.clamp(0.0, 1.0)
}

fn usable_norm(norm: f64) -> bool {
    norm.is_finite() && norm > 0.0
}

/// Accepts when `similarity` reaches the threshold; equality passes.
pub fn decide(similarity: f64, threshold: f64) -> bool {
    similarity >= threshold
}
