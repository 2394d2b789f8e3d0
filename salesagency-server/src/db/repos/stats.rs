//! Agent stats and campaign metrics
//!
//! Reads come in two flavours: `find_*` never writes, `ensure_*` inserts a
//! zeroed `"all"` row when the owner has none yet. Concurrent `ensure_*`
//! callers converge on the same row through the `(owner, period)` unique key.

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, Conditions};
use crate::models::{
    AgentStats, AgentStatsFilter, CampaignMetrics, CampaignMetricsFilter, Page, ALL_TIME,
};

const AGENT_COLUMNS: &str = "id, agent_id, leads_engaged, messages_delivered, response_rate, \
    conversion_rate, avg_response_time, period, created_at, updated_at";

const CAMPAIGN_COLUMNS: &str = "id, campaign_id, leads_targeted, messages_sent, responses, \
    conversions, response_rate, conversion_rate, period, created_at, updated_at";

/// Insert the zeroed lifetime row for an agent unless it already exists.
pub(crate) async fn provision_agent_stats(
    conn: &mut PgConnection,
    agent_id: Uuid,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO agent_stats (agent_id, period)
        VALUES ($1, $2)
        ON CONFLICT (agent_id, period) DO NOTHING
        "#,
    )
    .bind(agent_id)
    .bind(ALL_TIME)
    .execute(conn)
    .await
    .context("provision agent stats")?;
    Ok(())
}

/// Insert the zeroed lifetime row for a campaign unless it already exists.
pub(crate) async fn provision_campaign_metrics(
    conn: &mut PgConnection,
    campaign_id: Uuid,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO campaign_metrics (campaign_id, period)
        VALUES ($1, $2)
        ON CONFLICT (campaign_id, period) DO NOTHING
        "#,
    )
    .bind(campaign_id)
    .bind(ALL_TIME)
    .execute(conn)
    .await
    .context("provision campaign metrics")?;
    Ok(())
}

/// Agent stats repository
pub struct AgentStatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AgentStatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<AgentStats>, DbError> {
        sqlx::query_as::<_, AgentStats>(&format!(
            "SELECT {AGENT_COLUMNS} FROM agent_stats WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get agent stats")
    }

    /// Most recently created stats row for an agent, if any.
    pub async fn find_for_agent(&self, agent_id: Uuid) -> Result<Option<AgentStats>, DbError> {
        sqlx::query_as::<_, AgentStats>(&format!(
            r#"
            SELECT {AGENT_COLUMNS}
            FROM agent_stats
            WHERE agent_id = $1
            ORDER BY created_at DESC, id
            LIMIT 1
            "#
        ))
        .bind(agent_id)
        .fetch_optional(self.pool)
        .await
        .context("find agent stats")
    }

    /// Like `find_for_agent`, but provisions a zeroed `"all"` row first if
    /// the agent has none. Fails on the foreign key for an unknown agent.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_for_agent(&self, agent_id: Uuid) -> Result<AgentStats, DbError> {
        if let Some(stats) = self.find_for_agent(agent_id).await? {
            return Ok(stats);
        }

        let mut conn = self.pool.acquire().await.context("acquire connection")?;
        provision_agent_stats(&mut conn, agent_id).await?;
        tracing::debug!("provisioned lifetime stats row");

        self.find_for_agent(agent_id)
            .await?
            .ok_or_else(|| DbError::not_found("agent stats", agent_id))
    }

    pub async fn list(
        &self,
        filter: &AgentStatsFilter,
        page: Page,
    ) -> Result<Vec<AgentStats>, DbError> {
        let mut qb = agent_list_query(filter, page);
        qb.build_query_as::<AgentStats>()
            .fetch_all(self.pool)
            .await
            .context("list agent stats")
    }

    #[tracing::instrument(skip(self, stats), fields(id = %stats.id))]
    pub async fn update(&self, stats: &AgentStats) -> Result<AgentStats, DbError> {
        sqlx::query_as::<_, AgentStats>(&format!(
            r#"
            UPDATE agent_stats
            SET leads_engaged = $2, messages_delivered = $3, response_rate = $4,
                conversion_rate = $5, avg_response_time = $6, period = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {AGENT_COLUMNS}
            "#
        ))
        .bind(stats.id)
        .bind(stats.leads_engaged)
        .bind(stats.messages_delivered)
        .bind(stats.response_rate)
        .bind(stats.conversion_rate)
        .bind(stats.avg_response_time)
        .bind(&stats.period)
        .fetch_optional(self.pool)
        .await
        .context("update agent stats")?
        .ok_or_else(|| DbError::not_found("agent stats", stats.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM agent_stats WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete agent stats")?;
        Ok(result.rows_affected() > 0)
    }
}

/// Campaign metrics repository
pub struct CampaignMetricsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CampaignMetricsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<CampaignMetrics>, DbError> {
        sqlx::query_as::<_, CampaignMetrics>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaign_metrics WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get campaign metrics")
    }

    pub async fn find_for_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignMetrics>, DbError> {
        sqlx::query_as::<_, CampaignMetrics>(&format!(
            r#"
            SELECT {CAMPAIGN_COLUMNS}
            FROM campaign_metrics
            WHERE campaign_id = $1
            ORDER BY created_at DESC, id
            LIMIT 1
            "#
        ))
        .bind(campaign_id)
        .fetch_optional(self.pool)
        .await
        .context("find campaign metrics")
    }

    #[tracing::instrument(skip(self))]
    pub async fn ensure_for_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<CampaignMetrics, DbError> {
        if let Some(metrics) = self.find_for_campaign(campaign_id).await? {
            return Ok(metrics);
        }

        let mut conn = self.pool.acquire().await.context("acquire connection")?;
        provision_campaign_metrics(&mut conn, campaign_id).await?;

        self.find_for_campaign(campaign_id)
            .await?
            .ok_or_else(|| DbError::not_found("campaign metrics", campaign_id))
    }

    pub async fn list(
        &self,
        filter: &CampaignMetricsFilter,
        page: Page,
    ) -> Result<Vec<CampaignMetrics>, DbError> {
        let mut qb = campaign_list_query(filter, page);
        qb.build_query_as::<CampaignMetrics>()
            .fetch_all(self.pool)
            .await
            .context("list campaign metrics")
    }

    #[tracing::instrument(skip(self, metrics), fields(id = %metrics.id))]
    pub async fn update(&self, metrics: &CampaignMetrics) -> Result<CampaignMetrics, DbError> {
        sqlx::query_as::<_, CampaignMetrics>(&format!(
            r#"
            UPDATE campaign_metrics
            SET leads_targeted = $2, messages_sent = $3, responses = $4, conversions = $5,
                response_rate = $6, conversion_rate = $7, period = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {CAMPAIGN_COLUMNS}
            "#
        ))
        .bind(metrics.id)
        .bind(metrics.leads_targeted)
        .bind(metrics.messages_sent)
        .bind(metrics.responses)
        .bind(metrics.conversions)
        .bind(metrics.response_rate)
        .bind(metrics.conversion_rate)
        .bind(&metrics.period)
        .fetch_optional(self.pool)
        .await
        .context("update campaign metrics")?
        .ok_or_else(|| DbError::not_found("campaign metrics", metrics.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM campaign_metrics WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete campaign metrics")?;
        Ok(result.rows_affected() > 0)
    }
}

fn agent_list_query(filter: &AgentStatsFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {AGENT_COLUMNS} FROM agent_stats"));
    let mut conds = Conditions::new();

    if let Some(agent_id) = filter.agent_id {
        conds.next(&mut qb).push("agent_id = ").push_bind(agent_id);
    }
    if let Some(period) = &filter.period {
        conds.next(&mut qb).push("period = ").push_bind(period.clone());
    }

    qb.push(" ORDER BY created_at DESC, id");
    push_page(&mut qb, page);
    qb
}

fn campaign_list_query(
    filter: &CampaignMetricsFilter,
    page: Page,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {CAMPAIGN_COLUMNS} FROM campaign_metrics"));
    let mut conds = Conditions::new();

    if let Some(campaign_id) = filter.campaign_id {
        conds.next(&mut qb).push("campaign_id = ").push_bind(campaign_id);
    }
    if let Some(period) = &filter.period {
        conds.next(&mut qb).push("period = ").push_bind(period.clone());
    }

    qb.push(" ORDER BY created_at DESC, id");
    push_page(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{AgentRepo, CampaignRepo};
    use crate::models::{
        AgentStatus, CampaignStatus, NewAiAgent, NewCampaign, UpdateAgentStatsInput,
        UpdateCampaignMetricsInput,
    };
    use chrono::NaiveDate;

    #[test]
    fn stats_filters() {
        let qb = agent_list_query(
            &AgentStatsFilter {
                agent_id: Some(Uuid::nil()),
                period: Some("2024-Q2".into()),
            },
            Page::all(),
        );
        assert!(qb
            .sql()
            .ends_with(" WHERE agent_id = $1 AND period = $2 ORDER BY created_at DESC, id"));

        let qb = campaign_list_query(&CampaignMetricsFilter::default(), Page::all());
        assert!(!qb.sql().contains("WHERE"));
    }

    /// Agent row without its provisioned stats, as a pre-existing database
    /// would have.
    async fn bare_agent(pool: &PgPool) -> Uuid {
        let agent = AgentRepo::new(pool)
            .create(&NewAiAgent {
                name: "Nurturer".into(),
                purpose: "follow up".into(),
                description: None,
                status: AgentStatus::Active,
            })
            .await
            .unwrap();
        sqlx::query("DELETE FROM agent_stats WHERE agent_id = $1")
            .bind(agent.id)
            .execute(pool)
            .await
            .unwrap();
        agent.id
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn find_never_writes(pool: PgPool) {
        let agent_id = bare_agent(&pool).await;
        let repo = AgentStatsRepo::new(&pool);
        assert!(repo.find_for_agent(agent_id).await.unwrap().is_none());
        assert!(repo.find_for_agent(agent_id).await.unwrap().is_none());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn ensure_creates_once(pool: PgPool) {
        let agent_id = bare_agent(&pool).await;
        let repo = AgentStatsRepo::new(&pool);

        let first = repo.ensure_for_agent(agent_id).await.unwrap();
        assert_eq!(first.period, "all");
        assert_eq!(first.leads_engaged, 0);
        assert_eq!(first.messages_delivered, 0);
        assert_eq!(first.response_rate, 0.0);
        assert_eq!(first.conversion_rate, 0.0);
        assert_eq!(first.avg_response_time, 0.0);

        let second = repo.ensure_for_agent(agent_id).await.unwrap();
        assert_eq!(second.id, first.id);

        let rows = repo
            .list(
                &AgentStatsFilter {
                    agent_id: Some(agent_id),
                    period: None,
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn concurrent_ensure_converges(pool: PgPool) {
        let agent_id = bare_agent(&pool).await;
        let repo = AgentStatsRepo::new(&pool);
        let (a, b) = tokio::join!(repo.ensure_for_agent(agent_id), repo.ensure_for_agent(agent_id));
        assert_eq!(a.unwrap().id, b.unwrap().id);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn ensure_for_unknown_agent_fails(pool: PgPool) {
        let repo = AgentStatsRepo::new(&pool);
        assert!(matches!(
            repo.ensure_for_agent(Uuid::new_v4()).await,
            Err(DbError::Query { .. })
        ));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn agent_stats_partial_update(pool: PgPool) {
        let agent_id = bare_agent(&pool).await;
        let repo = AgentStatsRepo::new(&pool);
        let mut stats = repo.ensure_for_agent(agent_id).await.unwrap();
        stats.leads_engaged = 12;
        stats.avg_response_time = 340.5;
        let seeded = repo.update(&stats).await.unwrap();

        let mut stats = seeded.clone();
        UpdateAgentStatsInput {
            response_rate: Some(0.25),
            ..Default::default()
        }
        .apply_to(&mut stats);
        repo.update(&stats).await.unwrap();

        let fetched = repo.get(seeded.id).await.unwrap().unwrap();
        assert_eq!(fetched.response_rate, 0.25);
        assert_eq!(fetched.leads_engaged, 12);
        assert_eq!(fetched.messages_delivered, 0);
        assert_eq!(fetched.avg_response_time, 340.5);
        assert_eq!(fetched.conversion_rate, 0.0);
        assert_eq!(fetched.agent_id, agent_id);
        assert_eq!(fetched.period, ALL_TIME);

        assert!(repo.delete(fetched.id).await.unwrap());
        assert!(!repo.delete(fetched.id).await.unwrap());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn campaign_metrics_partial_update(pool: PgPool) {
        let campaign = CampaignRepo::new(&pool)
            .create(&NewCampaign {
                name: "Winter".into(),
                description: None,
                client_id: None,
                start_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                end_date: None,
                status: CampaignStatus::Active,
                budget: None,
            })
            .await
            .unwrap();
        let repo = CampaignMetricsRepo::new(&pool);
        let mut metrics = repo.ensure_for_campaign(campaign.id).await.unwrap();
        metrics.messages_sent = 400;
        metrics.responses = 36;
        let seeded = repo.update(&metrics).await.unwrap();

        let mut metrics = seeded.clone();
        UpdateCampaignMetricsInput {
            conversions: Some(4),
            ..Default::default()
        }
        .apply_to(&mut metrics);
        repo.update(&metrics).await.unwrap();

        let fetched = repo.get(seeded.id).await.unwrap().unwrap();
        assert_eq!(fetched.conversions, 4);
        assert_eq!(fetched.messages_sent, 400);
        assert_eq!(fetched.responses, 36);
        assert_eq!(fetched.leads_targeted, 0);
        assert_eq!(fetched.campaign_id, campaign.id);

        let listed = repo
            .list(
                &CampaignMetricsFilter {
                    campaign_id: Some(campaign.id),
                    period: None,
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(listed, vec![fetched.clone()]);

        assert!(repo.delete(fetched.id).await.unwrap());
        assert!(!repo.delete(fetched.id).await.unwrap());
    }
}
