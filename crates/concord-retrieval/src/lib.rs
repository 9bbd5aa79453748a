//! Retrieval strategies for Concord.
//!
//! The [`Retriever`] trait is the single seam the HTTP layer talks to: one
//! method taking a query string and a result budget, returning passages
//! ordered ascending by score (lower = more relevant). Three strategies
//! implement it:
//!
//! - [`KeywordRetriever`] — word-overlap matching over raw corpus lines.
//! - [`DenseRetriever`] — embed the query and search the vector index.
//! - [`CompletionRetriever`] — delegate to a remote completion API.
//!
//! The concrete strategy is chosen once at startup from configuration via
//! [`build_retriever`]; request handlers only ever see `Arc<dyn Retriever>`.

pub mod completion;
pub mod dense;
pub mod keyword;

use std::sync::Arc;

use async_trait::async_trait;

use concord_core::config::ConcordConfig;
use concord_core::error::{ConcordError, Result};
use concord_core::types::{IndexBackend, RetrievalStrategy, ScoredVerse};
use concord_corpus::Corpus;
use concord_vector::embedding::{DynEmbeddingService, HashEmbedding, OnnxEmbedder};

pub use completion::CompletionRetriever;
pub use dense::DenseRetriever;
pub use keyword::KeywordRetriever;

/// A retrieval strategy: free-text query in, scored passages out.
///
/// Implementations are read-only after construction and shared across
/// concurrent requests without locking.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `k` passages related to `query`, ascending by score.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredVerse>>;

    /// The strategy this retriever implements (reported by /health).
    fn strategy(&self) -> RetrievalStrategy;
}

/// Build the configured retrieval strategy.
///
/// For the dense strategy this embeds the whole corpus and constructs the
/// nearest-neighbor index, so it must complete before the service accepts
/// traffic. Any failure here is fatal to startup.
pub async fn build_retriever(
    config: &ConcordConfig,
    corpus: Arc<Corpus>,
) -> Result<Arc<dyn Retriever>> {
    let strategy = RetrievalStrategy::parse(&config.retrieval.strategy).ok_or_else(|| {
        ConcordError::Retrieval(format!(
            "Unknown retrieval strategy '{}'",
            config.retrieval.strategy
        ))
    })?;

    match strategy {
        RetrievalStrategy::Keyword => Ok(Arc::new(KeywordRetriever::new(corpus))),
        RetrievalStrategy::Dense => {
            let backend = IndexBackend::parse(&config.search.index_backend).ok_or_else(|| {
                ConcordError::Index(format!(
                    "Unknown index backend '{}'",
                    config.search.index_backend
                ))
            })?;

            let embedder: Box<dyn DynEmbeddingService> = match config.embedding.model_dir {
                Some(ref dir) => Box::new(OnnxEmbedder::from_directory(std::path::Path::new(dir))?),
                None => {
                    tracing::warn!(
                        "No embedding model_dir configured; using deterministic hash embedder"
                    );
                    Box::new(HashEmbedding::with_dimensions(config.embedding.dimension))
                }
            };

            let retriever = DenseRetriever::build_dyn(corpus, embedder, backend).await?;
            Ok(Arc::new(retriever))
        }
        RetrievalStrategy::Completion => {
            let retriever = CompletionRetriever::from_env(&config.completion)?;
            Ok(Arc::new(retriever))
        }
    }
}
