//! Dense vector retrieval: embed the query, search the nearest-neighbor
//! index, map positions back to verses.
//!
//! The index is built once from the full corpus and the same embedder
//! instance serves both construction and queries; the corpus and the index
//! are therefore position-aligned by construction and never diverge.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use concord_core::error::{ConcordError, Result};
use concord_core::types::{IndexBackend, RetrievalStrategy, ScoredVerse};
use concord_corpus::Corpus;
use concord_vector::embedding::{DynEmbeddingService, EmbeddingService};
use concord_vector::index::{build_index, VerseIndex};

use crate::Retriever;

/// Embedding-based retriever over a nearest-neighbor index.
///
/// Uses dynamic dispatch for the embedder so production code can supply
/// `OnnxEmbedder` while tests use `HashEmbedding`.
pub struct DenseRetriever {
    corpus: Arc<Corpus>,
    index: Box<dyn VerseIndex>,
    embedder: Box<dyn DynEmbeddingService>,
}

impl DenseRetriever {
    /// Embed every verse and build the configured index backend.
    ///
    /// Verses are embedded in corpus order so that index positions are valid
    /// corpus positions. Runs at startup; any failure is fatal to the caller.
    pub async fn build(
        corpus: Arc<Corpus>,
        embedder: impl EmbeddingService + 'static,
        backend: IndexBackend,
    ) -> Result<Self> {
        Self::build_dyn(corpus, Box::new(embedder), backend).await
    }

    /// Like [`DenseRetriever::build`] but from a pre-boxed embedder.
    pub async fn build_dyn(
        corpus: Arc<Corpus>,
        embedder: Box<dyn DynEmbeddingService>,
        backend: IndexBackend,
    ) -> Result<Self> {
        let mut vectors = Vec::with_capacity(corpus.len());
        for (_, verse) in corpus.iter() {
            vectors.push(embedder.embed_boxed(verse).await?);
        }

        let index = build_index(backend, vectors)?;
        info!(
            verses = corpus.len(),
            backend = backend.as_str(),
            "Dense retriever ready"
        );

        Ok(Self {
            corpus,
            index,
            embedder,
        })
    }

    /// Number of indexed verses.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the underlying corpus (and index) is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[async_trait]
impl Retriever for DenseRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredVerse>> {
        let query_vec = self.embedder.embed_boxed(query).await?;
        let hits = self.index.search(&query_vec, k)?;

        hits.into_iter()
            .map(|hit| {
                let verse = self.corpus.get(hit.position).ok_or_else(|| {
                    ConcordError::Index(format!(
                        "Index returned position {} beyond corpus of {} verses",
                        hit.position,
                        self.corpus.len()
                    ))
                })?;
                Ok(ScoredVerse {
                    verse: verse.to_string(),
                    score: hit.distance,
                })
            })
            .collect()
    }

    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Dense
    }
}
