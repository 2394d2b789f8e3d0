//! Interaction repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, Conditions};
use crate::models::{Interaction, InteractionFilter, NewInteraction, Page};

pub(crate) const COLUMNS: &str = "id, lead_id, type, channel, message, ai_agent_id, \
    template_id, timestamp, response, status, notes, created_at, updated_at";

/// Interaction log repository. Listing is newest `timestamp` first.
pub struct InteractionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InteractionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Interaction>, DbError> {
        sqlx::query_as::<_, Interaction>(&format!(
            "SELECT {COLUMNS} FROM interactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get interaction")
    }

    pub async fn list(
        &self,
        filter: &InteractionFilter,
        page: Page,
    ) -> Result<Vec<Interaction>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<Interaction>()
            .fetch_all(self.pool)
            .await
            .context("list interactions")
    }

    #[tracing::instrument(skip(self, interaction), fields(lead_id = %interaction.lead_id))]
    pub async fn create(&self, interaction: &NewInteraction) -> Result<Interaction, DbError> {
        sqlx::query_as::<_, Interaction>(&format!(
            r#"
            INSERT INTO interactions (lead_id, type, channel, message, ai_agent_id,
                                      template_id, timestamp, response, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(interaction.lead_id)
        .bind(interaction.kind)
        .bind(interaction.channel)
        .bind(&interaction.message)
        .bind(interaction.ai_agent_id)
        .bind(interaction.template_id)
        .bind(interaction.timestamp)
        .bind(&interaction.response)
        .bind(interaction.status)
        .bind(&interaction.notes)
        .fetch_one(self.pool)
        .await
        .context("create interaction")
    }

    #[tracing::instrument(skip(self, interaction), fields(id = %interaction.id))]
    pub async fn update(&self, interaction: &Interaction) -> Result<Interaction, DbError> {
        sqlx::query_as::<_, Interaction>(&format!(
            r#"
            UPDATE interactions
            SET lead_id = $2, type = $3, channel = $4, message = $5, ai_agent_id = $6,
                template_id = $7, timestamp = $8, response = $9, status = $10, notes = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(interaction.id)
        .bind(interaction.lead_id)
        .bind(interaction.kind)
        .bind(interaction.channel)
        .bind(&interaction.message)
        .bind(interaction.ai_agent_id)
        .bind(interaction.template_id)
        .bind(interaction.timestamp)
        .bind(&interaction.response)
        .bind(interaction.status)
        .bind(&interaction.notes)
        .fetch_optional(self.pool)
        .await
        .context("update interaction")?
        .ok_or_else(|| DbError::not_found("interaction", interaction.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM interactions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete interaction")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn for_lead(&self, lead_id: Uuid) -> Result<Vec<Interaction>, DbError> {
        let filter = InteractionFilter {
            lead_id: Some(lead_id),
            ..Default::default()
        };
        self.list(&filter, Page::all()).await
    }
}

fn list_query(filter: &InteractionFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM interactions"));
    let mut conds = Conditions::new();

    if let Some(lead_id) = filter.lead_id {
        conds.next(&mut qb).push("lead_id = ").push_bind(lead_id);
    }
    if let Some(agent_id) = filter.ai_agent_id {
        conds.next(&mut qb).push("ai_agent_id = ").push_bind(agent_id);
    }
    if let Some(kind) = filter.kind {
        conds.next(&mut qb).push("type = ").push_bind(kind);
    }
    if let Some(channel) = filter.channel {
        conds.next(&mut qb).push("channel = ").push_bind(channel);
    }
    if let Some(statuses) = filter.status.as_ref().filter(|s| !s.is_empty()) {
        conds
            .next(&mut qb)
            .push("status = ANY(")
            .push_bind(statuses.clone())
            .push(")");
    }
    if let Some(after) = filter.after {
        conds.next(&mut qb).push("timestamp >= ").push_bind(after);
    }
    if let Some(before) = filter.before {
        conds.next(&mut qb).push("timestamp <= ").push_bind(before);
    }

    qb.push(" ORDER BY timestamp DESC, id");
    push_page(&mut qb, page);
    qb
}
