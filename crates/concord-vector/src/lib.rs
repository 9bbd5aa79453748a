//! Embedding and nearest-neighbor indexing for Concord.
//!
//! Provides the embedding service trait with an ONNX sentence-transformer
//! backend and a deterministic hash-based fallback, plus two L2
//! nearest-neighbor index backends: exact brute force and approximate HNSW.

pub mod embedding;
pub mod index;

pub use embedding::{DynEmbeddingService, EmbeddingService, HashEmbedding, OnnxEmbedder};
pub use index::{build_index, ExactIndex, HnswVerseIndex, IndexHit, VerseIndex};
