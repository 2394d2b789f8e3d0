//! Agent stats and campaign metrics
//!
//! Reads provision the lifetime row when the owner exists but has none yet.
//! A read for an unknown owner is null.

use async_graphql::{Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    AgentStats, AgentStatsFilter, CampaignMetrics, CampaignMetricsFilter, Page,
    UpdateAgentStatsInput, UpdateCampaignMetricsInput,
};

#[derive(Default)]
pub struct StatsQuery;

#[Object]
impl StatsQuery {
    async fn agent_stats(&self, ctx: &Context<'_>, agent_id: Uuid) -> GqlResult<Option<AgentStats>> {
        let repo = ctx.data::<Repository>()?;
        if repo.agents().get(agent_id).await.gql()?.is_none() {
            return Ok(None);
        }
        repo.agent_stats().ensure_for_agent(agent_id).await.map(Some).gql()
    }

    async fn campaign_metrics(
        &self,
        ctx: &Context<'_>,
        campaign_id: Uuid,
    ) -> GqlResult<Option<CampaignMetrics>> {
        let repo = ctx.data::<Repository>()?;
        if repo.campaigns().get(campaign_id).await.gql()?.is_none() {
            return Ok(None);
        }
        repo.campaign_metrics()
            .ensure_for_campaign(campaign_id)
            .await
            .map(Some)
            .gql()
    }

    /// Stats row by its own id. Never provisions.
    async fn agent_stats_by_id(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<AgentStats>> {
        ctx.data::<Repository>()?.agent_stats().get(id).await.gql()
    }

    /// Stored stats rows across agents and periods, newest first.
    async fn agent_stats_list(
        &self,
        ctx: &Context<'_>,
        filter: Option<AgentStatsFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<AgentStats>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.agent_stats().list(&filter.unwrap_or_default(), page).await.gql()
    }

    async fn campaign_metrics_by_id(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> GqlResult<Option<CampaignMetrics>> {
        ctx.data::<Repository>()?.campaign_metrics().get(id).await.gql()
    }

    async fn campaign_metrics_list(
        &self,
        ctx: &Context<'_>,
        filter: Option<CampaignMetricsFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<CampaignMetrics>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.campaign_metrics()
            .list(&filter.unwrap_or_default(), page)
            .await
            .gql()
    }
}

#[derive(Default)]
pub struct StatsMutation;

#[Object]
impl StatsMutation {
    /// Patch the agent's latest stats row.
    async fn update_agent_stats(
        &self,
        ctx: &Context<'_>,
        agent_id: Uuid,
        input: UpdateAgentStatsInput,
    ) -> GqlResult<AgentStats> {
        let repo = ctx.data::<Repository>()?;
        require(repo.agents().get(agent_id).await.gql()?, "ai agent", agent_id)?;
        let mut stats = repo.agent_stats().ensure_for_agent(agent_id).await.gql()?;
        input.apply_to(&mut stats);
        stats.validate().gql()?;
        repo.agent_stats().update(&stats).await.gql()
    }

    /// Patch the campaign's latest metrics row.
    async fn update_campaign_metrics(
        &self,
        ctx: &Context<'_>,
        campaign_id: Uuid,
        input: UpdateCampaignMetricsInput,
    ) -> GqlResult<CampaignMetrics> {
        let repo = ctx.data::<Repository>()?;
        require(repo.campaigns().get(campaign_id).await.gql()?, "campaign", campaign_id)?;
        let mut metrics = repo
            .campaign_metrics()
            .ensure_for_campaign(campaign_id)
            .await
            .gql()?;
        input.apply_to(&mut metrics);
        metrics.validate().gql()?;
        repo.campaign_metrics().update(&metrics).await.gql()
    }

    /// Remove one stats row. The next `agentStats` read provisions a fresh one.
    async fn delete_agent_stats(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.agent_stats().delete(id).await.gql()
    }

    async fn delete_campaign_metrics(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.campaign_metrics().delete(id).await.gql()
    }
}
