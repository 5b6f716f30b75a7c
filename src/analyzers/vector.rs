use std::collections::HashMap;

pub type SparseVector = HashMap<String, f64>;

/// Dot product of `(word, weight)` pairs against a sparse vector. Words
/// missing from `rhs` contribute nothing.
pub fn dot<'a>(lhs: impl IntoIterator<Item = (&'a str, f64)>, rhs: &SparseVector) -> f64 {
    lhs.into_iter()
        .map(|(word, weight)| rhs.get(word).copied().unwrap_or(0.0) * weight)
        .sum()
}

/// Euclidean norm of a set of weights.
pub fn norm(weights: impl IntoIterator<Item = f64>) -> f64 {
    weights.into_iter().map(|w| w * w).sum::<f64>().sqrt()
}

/// Cosine similarity from a precomputed dot product and the two norms.
/// A zero-norm side makes the similarity `0.0`.
pub fn cosine(dot: f64, lhs_norm: f64, rhs_norm: f64) -> f64 {
    let denominator = lhs_norm * rhs_norm;

    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}
