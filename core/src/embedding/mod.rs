mod embedder;
mod error;
mod index;

pub use embedder::{Embedder, Embedding};
pub use error::EmbeddingError;
pub use index::{IndexError, Neighbor, SimilarityIndex};
