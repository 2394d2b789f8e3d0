//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One bounded pool shared by every request - no Arc<Mutex<Connection>>
//! - Storage does full-row writes; partial updates are merged one layer up
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations

pub mod error;
pub mod pool;
pub(crate) mod query;
pub mod repos;

use sqlx::PgPool;

pub use error::DbError;
pub use pool::{close, connect, migrate, PoolConfig};
pub use repos::*;

/// Bundled schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Handle over the shared pool, handed to resolvers at schema construction.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn leads(&self) -> LeadRepo<'_> {
        LeadRepo::new(&self.pool)
    }

    pub fn clients(&self) -> ClientRepo<'_> {
        ClientRepo::new(&self.pool)
    }

    pub fn agents(&self) -> AgentRepo<'_> {
        AgentRepo::new(&self.pool)
    }

    pub fn campaigns(&self) -> CampaignRepo<'_> {
        CampaignRepo::new(&self.pool)
    }

    pub fn interactions(&self) -> InteractionRepo<'_> {
        InteractionRepo::new(&self.pool)
    }

    pub fn templates(&self) -> TemplateRepo<'_> {
        TemplateRepo::new(&self.pool)
    }

    pub fn audiences(&self) -> AudienceRepo<'_> {
        AudienceRepo::new(&self.pool)
    }

    pub fn services(&self) -> ServiceRepo<'_> {
        ServiceRepo::new(&self.pool)
    }

    pub fn agent_stats(&self) -> AgentStatsRepo<'_> {
        AgentStatsRepo::new(&self.pool)
    }

    pub fn campaign_metrics(&self) -> CampaignMetricsRepo<'_> {
        CampaignMetricsRepo::new(&self.pool)
    }

    pub fn users(&self) -> UserRepo<'_> {
        UserRepo::new(&self.pool)
    }

    pub fn programs(&self) -> ProgramRepo<'_> {
        ProgramRepo::new(&self.pool)
    }

    pub fn modules(&self) -> ModuleRepo<'_> {
        ModuleRepo::new(&self.pool)
    }
}
