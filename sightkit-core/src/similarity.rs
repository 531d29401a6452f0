//! Cosine similarity and distance over raw feature vectors.
//!
//! Inputs are `f32` slices as produced by feature-print requests, but all
//! accumulation happens in `f64` so long embeddings do not lose precision.
//! Degenerate inputs (mismatched lengths, zero magnitude) surface as typed
//! errors rather than a sentinel score.

use thiserror::Error;

/// Magnitudes below this are treated as zero.
const MIN_MAGNITUDE: f64 = 1e-12;

/// Reasons a similarity comparison can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimilarityError {
    /// The two vectors have different dimensionality.
    #[error("embedding lengths differ: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },
    /// At least one vector has (near-)zero magnitude, including empty input.
    #[error("cannot compare a zero-magnitude embedding")]
    ZeroMagnitude,
}

/// Computes the cosine similarity between two vectors.
///
/// Returns a value in `[-1.0, 1.0]` where `1.0` means identical direction,
/// `0.0` orthogonal, and `-1.0` opposite. The dot product and both norms are
/// accumulated in a single pass using fused multiply-add.
///
/// # Errors
///
/// * [`SimilarityError::LengthMismatch`] when the slices differ in length.
/// * [`SimilarityError::ZeroMagnitude`] when either vector has no direction.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot = x.mul_add(y, dot);
        norm_a = x.mul_add(x, norm_a);
        norm_b = y.mul_add(y, norm_b);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < MIN_MAGNITUDE {
        return Err(SimilarityError::ZeroMagnitude);
    }

    // Rounding can push the quotient a hair outside the valid range.
    Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Computes the cosine distance `1 - similarity` between two vectors.
///
/// The result lies in `[0.0, 2.0]`: `0.0` for identical direction, `1.0` for
/// orthogonal vectors, `2.0` for opposite ones. Fails under the same
/// conditions as [`cosine_similarity`].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    Ok(1.0 - cosine_similarity(a, b)?)
}
