//! AI agent repository
//!
//! Agents own a lifetime stats row which is provisioned in the same
//! transaction as the agent itself. Trigger/pause/resume only write status.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::stats::provision_agent_stats;
use super::{DbError, QueryContext};
use crate::db::query::{push_page, qualified, Conditions};
use crate::models::{AgentFilter, AgentStatus, AiAgent, NewAiAgent, Page};

pub(crate) const COLUMNS: &str =
    "id, name, purpose, description, status, last_run, created_at, updated_at";

/// AI agent repository
pub struct AgentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AgentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<AiAgent>, DbError> {
        sqlx::query_as::<_, AiAgent>(&format!("SELECT {COLUMNS} FROM ai_agents WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("get agent")
    }

    pub async fn list(&self, filter: &AgentFilter, page: Page) -> Result<Vec<AiAgent>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<AiAgent>()
            .fetch_all(self.pool)
            .await
            .context("list agents")
    }

    /// Insert an agent together with its zeroed lifetime stats row.
    #[tracing::instrument(skip(self, agent), fields(name = %agent.name))]
    pub async fn create(&self, agent: &NewAiAgent) -> Result<AiAgent, DbError> {
        let mut tx = self.pool.begin().await.context("begin agent insert")?;

        let created = sqlx::query_as::<_, AiAgent>(&format!(
            r#"
            INSERT INTO ai_agents (name, purpose, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&agent.name)
        .bind(&agent.purpose)
        .bind(&agent.description)
        .bind(agent.status)
        .fetch_one(&mut *tx)
        .await
        .context("create agent")?;

        provision_agent_stats(&mut tx, created.id).await?;

        tx.commit().await.context("commit agent insert")?;
        Ok(created)
    }

    #[tracing::instrument(skip(self, agent), fields(id = %agent.id))]
    pub async fn update(&self, agent: &AiAgent) -> Result<AiAgent, DbError> {
        sqlx::query_as::<_, AiAgent>(&format!(
            r#"
            UPDATE ai_agents
            SET name = $2, purpose = $3, description = $4, status = $5, last_run = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(agent.id)
        .bind(&agent.name)
        .bind(&agent.purpose)
        .bind(&agent.description)
        .bind(agent.status)
        .bind(agent.last_run)
        .fetch_optional(self.pool)
        .await
        .context("update agent")?
        .ok_or_else(|| DbError::not_found("agent", agent.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM ai_agents WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete agent")?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an agent as running and stamp `last_run`.
    #[tracing::instrument(skip(self))]
    pub async fn trigger_run(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE ai_agents
            SET status = $2, last_run = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(AgentStatus::Running)
        .execute(self.pool)
        .await
        .context("trigger agent run")?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite status only. Used for pause and resume.
    #[tracing::instrument(skip(self))]
    pub async fn set_status(&self, id: Uuid, status: AgentStatus) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE ai_agents SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(self.pool)
        .await
        .context("set agent status")?;
        Ok(result.rows_affected() > 0)
    }

    /// Agents working a lead.
    pub async fn for_lead(&self, lead_id: Uuid) -> Result<Vec<AiAgent>, DbError> {
        self.joined(
            "JOIN lead_ai_agent j ON j.ai_agent_id = a.id WHERE j.lead_id = $1",
            lead_id,
            "agents for lead",
        )
        .await
    }

    pub async fn for_campaign(&self, campaign_id: Uuid) -> Result<Vec<AiAgent>, DbError> {
        self.joined(
            "JOIN campaign_ai_agent j ON j.ai_agent_id = a.id WHERE j.campaign_id = $1",
            campaign_id,
            "agents for campaign",
        )
        .await
    }

    pub async fn for_template(&self, template_id: Uuid) -> Result<Vec<AiAgent>, DbError> {
        self.joined(
            "JOIN ai_agent_template j ON j.ai_agent_id = a.id WHERE j.template_id = $1",
            template_id,
            "agents for template",
        )
        .await
    }

    async fn joined(
        &self,
        join: &str,
        key: Uuid,
        context: &'static str,
    ) -> Result<Vec<AiAgent>, DbError> {
        sqlx::query_as::<_, AiAgent>(&format!(
            "SELECT {cols} FROM ai_agents a {join} ORDER BY a.name, a.id",
            cols = qualified(COLUMNS, "a")
        ))
        .bind(key)
        .fetch_all(self.pool)
        .await
        .context(context)
    }
}

fn list_query(filter: &AgentFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM ai_agents"));
    let mut conds = Conditions::new();

    if let Some(statuses) = filter.status.as_ref().filter(|s| !s.is_empty()) {
        conds
            .next(&mut qb)
            .push("status = ANY(")
            .push_bind(statuses.clone())
            .push(")");
    }
    if let Some(purpose) = &filter.purpose {
        conds.next(&mut qb).push("purpose = ").push_bind(purpose.clone());
    }

    qb.push(" ORDER BY name, id");
    push_page(&mut qb, page);
    qb
}
