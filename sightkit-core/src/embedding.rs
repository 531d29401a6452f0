//! Feature-print embeddings.
//!
//! Backends expose feature prints as an opaque little-endian `f32` blob; this
//! module decodes that into a typed vector and layers the similarity helpers
//! on top. Embeddings serialize as a bare JSON array so reports stay compact.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::similarity::{SimilarityError, cosine_distance, cosine_similarity};

/// Errors decoding a raw feature-print payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    /// The payload length does not decompose into 32-bit floats.
    #[error("feature-print payload of {len} bytes is not a multiple of 4")]
    InvalidByteLength {
        /// Observed payload length in bytes.
        len: usize,
    },
}

/// A feature-print embedding produced by an image or region request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Wraps an already-decoded vector.
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Decodes a little-endian `f32` payload as handed back by the backend.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, EmbeddingError> {
        if bytes.len() % 4 != 0 {
            return Err(EmbeddingError::InvalidByteLength { len: bytes.len() });
        }
        let mut values = Vec::with_capacity(bytes.len() / 4);
        for chunk in bytes.chunks_exact(4) {
            values.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        Ok(Self(values))
    }

    /// Encodes the embedding back into its little-endian byte form.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.0.len() * 4);
        for value in &self.0 {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the embedding has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the raw components.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Cosine similarity to another embedding.
    pub fn similarity_to(&self, other: &Embedding) -> Result<f64, SimilarityError> {
        cosine_similarity(&self.0, &other.0)
    }

    /// Cosine distance to another embedding.
    pub fn distance_to(&self, other: &Embedding) -> Result<f64, SimilarityError> {
        cosine_distance(&self.0, &other.0)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}
