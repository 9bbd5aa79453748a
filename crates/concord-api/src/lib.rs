//! Concord API crate - axum HTTP server and route handlers.
//!
//! Exposes the passage-retrieval endpoint (`POST /analyze`) and a health
//! check (`GET /health`). The surface is unauthenticated and fully open to
//! cross-origin requests.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
