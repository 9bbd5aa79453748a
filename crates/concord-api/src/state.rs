//! Application state shared across all route handlers.
//!
//! AppState is the explicit application context: it is constructed once
//! during startup, before the listener binds, and is read-only afterwards.
//! Handlers receive it via axum's State extractor; every field is behind an
//! `Arc` so cloning per request is cheap and lock-free.

use std::sync::Arc;
use std::time::Instant;

use concord_core::config::ConcordConfig;
use concord_retrieval::Retriever;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (fixed after startup).
    pub config: Arc<ConcordConfig>,
    /// The active retrieval strategy.
    pub retriever: Arc<dyn Retriever>,
    /// Number of verses in the loaded corpus.
    pub corpus_size: usize,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    /// Create the application context from its startup components.
    pub fn new(config: ConcordConfig, retriever: Arc<dyn Retriever>, corpus_size: usize) -> Self {
        Self {
            config: Arc::new(config),
            retriever,
            corpus_size,
            start_time: Instant::now(),
        }
    }
}
