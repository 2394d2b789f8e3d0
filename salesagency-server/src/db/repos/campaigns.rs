//! Campaign repository
//!
//! Creation is transactional: the campaign row, its agent links and its
//! lifetime metrics row land together or not at all.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::stats::provision_campaign_metrics;
use super::{DbError, QueryContext};
use crate::db::query::{push_page, qualified, Conditions};
use crate::models::{Campaign, CampaignFilter, NewCampaign, Page};

pub(crate) const COLUMNS: &str = "id, name, description, client_id, start_date, end_date, \
    status, budget, created_at, updated_at";

/// Campaign repository
pub struct CampaignRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CampaignRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Campaign>, DbError> {
        sqlx::query_as::<_, Campaign>(&format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("get campaign")
    }

    /// List campaigns, newest first.
    pub async fn list(&self, filter: &CampaignFilter, page: Page) -> Result<Vec<Campaign>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<Campaign>()
            .fetch_all(self.pool)
            .await
            .context("list campaigns")
    }

    pub async fn create(&self, campaign: &NewCampaign) -> Result<Campaign, DbError> {
        self.create_with_agents(campaign, &[]).await
    }

    /// Insert a campaign, link `agent_ids` and provision metrics (atomic).
    #[tracing::instrument(skip(self, campaign, agent_ids), fields(name = %campaign.name, agents = agent_ids.len()))]
    pub async fn create_with_agents(
        &self,
        campaign: &NewCampaign,
        agent_ids: &[Uuid],
    ) -> Result<Campaign, DbError> {
        let mut tx = self.pool.begin().await.context("begin campaign insert")?;

        let created = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (name, description, client_id, start_date, end_date,
                                   status, budget)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(campaign.client_id)
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.status)
        .bind(campaign.budget)
        .fetch_one(&mut *tx)
        .await
        .context("create campaign")?;

        for agent_id in agent_ids {
            sqlx::query(
                r#"
                INSERT INTO campaign_ai_agent (campaign_id, ai_agent_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(created.id)
            .bind(agent_id)
            .execute(&mut *tx)
            .await
            .context("link agent to campaign")?;
        }

        provision_campaign_metrics(&mut tx, created.id).await?;

        tx.commit().await.context("commit campaign insert")?;
        Ok(created)
    }

    #[tracing::instrument(skip(self, campaign), fields(id = %campaign.id))]
    pub async fn update(&self, campaign: &Campaign) -> Result<Campaign, DbError> {
        sqlx::query_as::<_, Campaign>(&format!(
            r#"
            UPDATE campaigns
            SET name = $2, description = $3, client_id = $4, start_date = $5,
                end_date = $6, status = $7, budget = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(campaign.id)
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(campaign.client_id)
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.status)
        .bind(campaign.budget)
        .fetch_optional(self.pool)
        .await
        .context("update campaign")?
        .ok_or_else(|| DbError::not_found("campaign", campaign.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete campaign")?;
        Ok(result.rows_affected() > 0)
    }

    /// Campaigns run for a client, newest first.
    pub async fn for_client(&self, client_id: Uuid) -> Result<Vec<Campaign>, DbError> {
        sqlx::query_as::<_, Campaign>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM campaigns
            WHERE client_id = $1
            ORDER BY created_at DESC, id
            "#
        ))
        .bind(client_id)
        .fetch_all(self.pool)
        .await
        .context("campaigns for client")
    }

    /// Campaigns an agent is attached to.
    pub async fn for_agent(&self, agent_id: Uuid) -> Result<Vec<Campaign>, DbError> {
        sqlx::query_as::<_, Campaign>(&format!(
            r#"
            SELECT {cols}
            FROM campaigns c
            JOIN campaign_ai_agent ca ON ca.campaign_id = c.id
            WHERE ca.ai_agent_id = $1
            ORDER BY c.created_at DESC, c.id
            "#,
            cols = qualified(COLUMNS, "c")
        ))
        .bind(agent_id)
        .fetch_all(self.pool)
        .await
        .context("campaigns for agent")
    }
}

fn list_query(filter: &CampaignFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM campaigns"));
    let mut conds = Conditions::new();

    if let Some(statuses) = filter.status.as_ref().filter(|s| !s.is_empty()) {
        conds
            .next(&mut qb)
            .push("status = ANY(")
            .push_bind(statuses.clone())
            .push(")");
    }
    if let Some(client_id) = filter.client_id {
        conds.next(&mut qb).push("client_id = ").push_bind(client_id);
    }
    if let Some(after) = filter.start_after {
        conds.next(&mut qb).push("start_date >= ").push_bind(after);
    }
    if let Some(before) = filter.start_before {
        conds.next(&mut qb).push("start_date <= ").push_bind(before);
    }

    qb.push(" ORDER BY created_at DESC, id");
    push_page(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{AgentRepo, CampaignMetricsRepo};
    use crate::models::{AgentStatus, CampaignStatus, NewAiAgent, UpdateCampaignInput};
    use async_graphql::MaybeUndefined;
    use chrono::NaiveDate;

    #[test]
    fn start_window_filter() {
        let filter = CampaignFilter {
            client_id: Some(Uuid::nil()),
            start_after: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let qb = list_query(&filter, Page::all());
        assert!(qb
            .sql()
            .ends_with(" WHERE client_id = $1 AND start_date >= $2 ORDER BY created_at DESC, id"));
    }

    fn spring() -> NewCampaign {
        NewCampaign {
            name: "Spring outbound".into(),
            description: None,
            client_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            status: CampaignStatus::Draft,
            budget: Some(1000.0),
        }
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn create_links_agents_and_metrics(pool: PgPool) {
        let agent = AgentRepo::new(&pool)
            .create(&NewAiAgent {
                name: "Closer".into(),
                purpose: "booking".into(),
                description: None,
                status: AgentStatus::Active,
            })
            .await
            .unwrap();
        let repo = CampaignRepo::new(&pool);
        let campaign = repo.create_with_agents(&spring(), &[agent.id]).await.unwrap();

        assert_eq!(repo.for_agent(agent.id).await.unwrap(), vec![campaign.clone()]);
        let metrics = CampaignMetricsRepo::new(&pool)
            .find_for_campaign(campaign.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metrics.period, "all");
        assert_eq!(metrics.messages_sent, 0);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn unknown_agent_aborts_create(pool: PgPool) {
        let repo = CampaignRepo::new(&pool);
        assert!(repo
            .create_with_agents(&spring(), &[Uuid::new_v4()])
            .await
            .is_err());
        assert!(repo
            .list(&CampaignFilter::default(), Page::all())
            .await
            .unwrap()
            .is_empty());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn partial_update_then_delete(pool: PgPool) {
        let repo = CampaignRepo::new(&pool);
        let created = repo
            .create(&NewCampaign {
                description: Some("first wave".into()),
                ..spring()
            })
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        let mut campaign = created.clone();
        UpdateCampaignInput {
            status: Some(CampaignStatus::Active),
            end_date: MaybeUndefined::Value(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            ..Default::default()
        }
        .apply_to(&mut campaign);
        repo.update(&campaign).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, CampaignStatus::Active);
        assert_eq!(fetched.end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(fetched.name, created.name);
        assert_eq!(fetched.description.as_deref(), Some("first wave"));
        assert_eq!(fetched.start_date, created.start_date);
        assert_eq!(fetched.budget, Some(1000.0));

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[test]
    fn empty_status_set_is_ignored() {
        let filter = CampaignFilter {
            status: Some(vec![]),
            ..Default::default()
        };
        let qb = list_query(&filter, Page::all());
        assert!(!qb.sql().contains("WHERE"));
    }
}
