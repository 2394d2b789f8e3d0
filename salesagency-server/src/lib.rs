//! salesagency-server: CRM data layer behind a GraphQL API
//!
//! Postgres repositories for leads, clients, AI agents, campaigns and the
//! entities around them, exposed through an async-graphql schema served by
//! axum.

pub mod db;
pub mod error;
pub mod graphql;
pub mod http;
pub mod models;

pub use db::{DbError, PoolConfig, Repository, MIGRATOR};
pub use error::ApiError;
pub use graphql::{build_schema, sdl, CrmSchema};
pub use http::{run_server, ServerConfig, ServerError};
