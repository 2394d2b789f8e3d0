//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; cheap to construct per call
//! - Lists are built with `QueryBuilder` from the present filter fields only
//! - Association writes run in one transaction and use ON CONFLICT DO NOTHING
//! - Driver errors carry the failing operation as context

pub mod agents;
pub mod audiences;
pub mod campaigns;
pub mod clients;
pub mod interactions;
pub mod leads;
pub mod services;
pub mod stats;
pub mod templates;
pub mod training;
pub mod users;

pub use super::error::DbError;
pub(crate) use super::error::QueryContext;

pub use agents::AgentRepo;
pub use audiences::AudienceRepo;
pub use campaigns::CampaignRepo;
pub use clients::ClientRepo;
pub use interactions::InteractionRepo;
pub use leads::LeadRepo;
pub use services::ServiceRepo;
pub use stats::{AgentStatsRepo, CampaignMetricsRepo};
pub use templates::TemplateRepo;
pub use training::{ModuleRepo, ProgramRepo};
pub use users::UserRepo;
