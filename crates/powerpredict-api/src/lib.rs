//! PowerPredict API crate - axum HTTP server and route handlers.
//!
//! Exposes bill estimation, rule-based energy advice, and the optional
//! LLM fallback chat over a small JSON API.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
