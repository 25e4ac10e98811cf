//! Embedders usable by the retriever.

mod hashing;
#[cfg(feature = "fastembed")]
mod fastembed;

pub use hashing::HashingEmbedder;
#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedEmbedder;
