//! Message template repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, qualified, Conditions};
use crate::models::{MessageTemplate, MessageTemplateFilter, NewMessageTemplate, Page};

pub(crate) const COLUMNS: &str =
    "id, name, content, variables, channel, purpose, campaign_id, created_at, updated_at";

/// Message template repository
pub struct TemplateRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TemplateRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<MessageTemplate>, DbError> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            "SELECT {COLUMNS} FROM message_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get template")
    }

    pub async fn list(
        &self,
        filter: &MessageTemplateFilter,
        page: Page,
    ) -> Result<Vec<MessageTemplate>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<MessageTemplate>()
            .fetch_all(self.pool)
            .await
            .context("list templates")
    }

    pub async fn create(&self, template: &NewMessageTemplate) -> Result<MessageTemplate, DbError> {
        self.create_with_agents(template, &[]).await
    }

    /// Insert a template and link it to `agent_ids` (atomic).
    #[tracing::instrument(skip(self, template, agent_ids), fields(name = %template.name))]
    pub async fn create_with_agents(
        &self,
        template: &NewMessageTemplate,
        agent_ids: &[Uuid],
    ) -> Result<MessageTemplate, DbError> {
        let mut tx = self.pool.begin().await.context("begin template insert")?;

        let created = sqlx::query_as::<_, MessageTemplate>(&format!(
            r#"
            INSERT INTO message_templates (name, content, variables, channel, purpose, campaign_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&template.name)
        .bind(&template.content)
        .bind(&template.variables)
        .bind(template.channel)
        .bind(&template.purpose)
        .bind(template.campaign_id)
        .fetch_one(&mut *tx)
        .await
        .context("create template")?;

        for agent_id in agent_ids {
            sqlx::query(
                r#"
                INSERT INTO ai_agent_template (ai_agent_id, template_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(agent_id)
            .bind(created.id)
            .execute(&mut *tx)
            .await
            .context("link agent to template")?;
        }

        tx.commit().await.context("commit template insert")?;
        Ok(created)
    }

    #[tracing::instrument(skip(self, template), fields(id = %template.id))]
    pub async fn update(&self, template: &MessageTemplate) -> Result<MessageTemplate, DbError> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            r#"
            UPDATE message_templates
            SET name = $2, content = $3, variables = $4, channel = $5, purpose = $6,
                campaign_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.content)
        .bind(&template.variables)
        .bind(template.channel)
        .bind(&template.purpose)
        .bind(template.campaign_id)
        .fetch_optional(self.pool)
        .await
        .context("update template")?
        .ok_or_else(|| DbError::not_found("template", template.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM message_templates WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete template")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn for_campaign(&self, campaign_id: Uuid) -> Result<Vec<MessageTemplate>, DbError> {
        let filter = MessageTemplateFilter {
            campaign_id: Some(campaign_id),
            ..Default::default()
        };
        self.list(&filter, Page::all()).await
    }

    pub async fn for_agent(&self, agent_id: Uuid) -> Result<Vec<MessageTemplate>, DbError> {
        sqlx::query_as::<_, MessageTemplate>(&format!(
            r#"
            SELECT {cols}
            FROM message_templates t
            JOIN ai_agent_template j ON j.template_id = t.id
            WHERE j.ai_agent_id = $1
            ORDER BY t.name, t.id
            "#,
            cols = qualified(COLUMNS, "t")
        ))
        .bind(agent_id)
        .fetch_all(self.pool)
        .await
        .context("templates for agent")
    }
}

fn list_query(filter: &MessageTemplateFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM message_templates"));
    let mut conds = Conditions::new();

    if let Some(channel) = filter.channel {
        conds.next(&mut qb).push("channel = ").push_bind(channel);
    }
    if let Some(purpose) = &filter.purpose {
        conds.next(&mut qb).push("purpose = ").push_bind(purpose.clone());
    }
    if let Some(campaign_id) = filter.campaign_id {
        conds.next(&mut qb).push("campaign_id = ").push_bind(campaign_id);
    }

    qb.push(" ORDER BY name, id");
    push_page(&mut qb, page);
    qb
}
