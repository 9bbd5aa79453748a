//! Concord service binary - composition root.
//!
//! Startup sequence:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Load the corpus text file (fatal if unreadable)
//! 3. Build the configured retrieval strategy — for the dense strategy this
//!    embeds the whole corpus and constructs the nearest-neighbor index
//! 4. Assemble the read-only application context and serve the axum API
//!
//! Every startup failure exits nonzero before the listener binds; the
//! service never accepts traffic without its corpus and retriever.

mod cli;

use std::sync::Arc;

use clap::Parser;

use concord_api::routes;
use concord_api::state::AppState;
use concord_core::config::ConcordConfig;
use concord_corpus::Corpus;
use concord_retrieval::build_retriever;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first: the log level may come from the file. Load outcome is
    // re-reported below once tracing is up.
    let config_file = args.resolve_config_path();
    let load_result = ConcordConfig::load(&config_file);
    let config = match &load_result {
        Ok(config) => config.clone(),
        Err(_) => ConcordConfig::default(),
    };

    // Tracing: RUST_LOG wins, then --log-level, then the config file.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Concord v{}", env!("CARGO_PKG_VERSION"));

    match load_result {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Could not load config; using defaults"
        ),
    }

    // Corpus. The service must not start without it.
    let corpus_path = args.resolve_corpus_path(&config.general.corpus_path);
    let corpus = match Corpus::load(&corpus_path) {
        Ok(corpus) => Arc::new(corpus),
        Err(e) => {
            tracing::error!(path = %corpus_path.display(), error = %e, "Failed to load corpus");
            return Err(e.into());
        }
    };
    if corpus.is_empty() {
        tracing::warn!(path = %corpus_path.display(), "Corpus contains no verses");
    }

    // Retrieval strategy. For "dense" this embeds every verse and builds the
    // index; traffic is only accepted once this completes.
    let retriever = match build_retriever(&config, Arc::clone(&corpus)).await {
        Ok(retriever) => retriever,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build retriever");
            return Err(e.into());
        }
    };
    tracing::info!(
        strategy = retriever.strategy().as_str(),
        verses = corpus.len(),
        "Retriever ready"
    );

    // API server over the read-only application context.
    let port = args.resolve_port(config.general.port);
    let state = AppState::new(config, retriever, corpus.len());

    if let Err(e) = routes::start_server(port, state).await {
        tracing::error!(port, error = %e, "Server exited with error — is the port already in use?");
        return Err(e.into());
    }

    Ok(())
}
