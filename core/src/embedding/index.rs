use serde::Serialize;
use thiserror::Error;

use super::Embedding;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A vector's length differs from the index dimension.
    ///
    /// `position` is the offending vector's position in the build input, or `None` for a query
    /// vector.
    #[error("Dimension mismatch (position: {position:?}, expected: {expected}, actual: {actual})")]
    DimensionMismatch {
        position: Option<usize>,
        expected: usize,
        actual: usize,
    },

    /// A vector contains NaN or an infinite component.
    ///
    /// `position` is the offending vector's position in the build input, or `None` for a query
    /// vector.
    #[error("Non-finite vector component (position: {position:?})")]
    NonFinite { position: Option<usize> },

    /// A query was run against an index holding no vectors.
    #[error("Similarity index is empty")]
    EmptyIndex,
}

/// One search hit: the stored vector's position and its squared Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Exact in-memory nearest-neighbor index over a small, fixed batch of vectors.
///
/// Position `i` of the build input is identifier `i` in the index. The index is built once and
/// never updated; build a new one for every request. Search is an exhaustive scan, so results
/// are exact and deterministic.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dimension: usize,
    vectors: Vec<Embedding>,
}

impl SimilarityIndex {
    /// Builds an index over `vectors`, taking the dimension from the first vector.
    pub fn build(vectors: Vec<Embedding>) -> Result<Self, IndexError> {
        let dimension = vectors.first().map_or(0, Embedding::len);
        Self::build_with_dimension(dimension, vectors)
    }

    /// Builds an index whose vectors must all have exactly `dimension` components.
    pub fn build_with_dimension(dimension: usize, vectors: Vec<Embedding>) -> Result<Self, IndexError> {
        if let Some((position, vector)) = vectors.iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension)
        {
            return Err(IndexError::DimensionMismatch {
                position: Some(position),
                expected: dimension,
                actual: vector.len(),
            });
        }
        if let Some(position) = vectors.iter().position(|v| !is_finite(v)) {
            return Err(IndexError::NonFinite { position: Some(position) });
        }
        Ok(Self { dimension, vectors })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Returns the `k` stored vectors closest to `query`.
    ///
    /// Results are ordered by ascending squared Euclidean distance; equal distances keep the
    /// lower position first. `k` is clamped to the number of stored vectors.
    pub fn nearest(&self, query: &Embedding, k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if self.vectors.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        let mismatch = IndexError::DimensionMismatch {
            position: None,
            expected: self.dimension,
            actual: query.len(),
        };
        if query.len() != self.dimension {
            return Err(mismatch);
        }
        if !is_finite(query) {
            return Err(IndexError::NonFinite { position: None });
        }

        let mut neighbors = self.vectors.iter()
            .enumerate()
            .map(|(position, vector)| {
                vector.squared_distance(query)
                    .map(|distance| Neighbor { position, distance })
                    .ok_or_else(|| mismatch.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        neighbors.sort_by(|a, b| {
            a.distance.total_cmp(&b.distance).then(a.position.cmp(&b.position))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

fn is_finite(vector: &Embedding) -> bool {
    vector.as_slice().iter().all(|v| v.is_finite())
}
