//! HTTP server layer
//!
//! Axum server with:
//! - GraphQL on POST /query, GraphiQL on GET /
//! - Health probe on GET /health
//! - CORS (localhost only by default)
//! - Request tracing and timeout
//! - Graceful shutdown

pub mod routes;
pub mod server;

pub use server::{app, run_server, AppState, ServerConfig, ServerError};
