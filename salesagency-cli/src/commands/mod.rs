//! Command implementations for the salesagency CLI

pub mod migrate;
pub mod schema;
pub mod serve;

pub use migrate::run_migrate;
pub use schema::run_schema;
pub use serve::run_serve;
