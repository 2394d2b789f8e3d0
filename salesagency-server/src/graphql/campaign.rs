use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    AiAgent, Campaign, CampaignFilter, CampaignMetrics, Client, CreateCampaignInput,
    MessageTemplate, Page, TargetAudience, UpdateCampaignInput,
};

#[derive(Default)]
pub struct CampaignQuery;

#[Object]
impl CampaignQuery {
    async fn campaign(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<Campaign>> {
        ctx.data::<Repository>()?.campaigns().get(id).await.gql()
    }

    async fn campaigns(
        &self,
        ctx: &Context<'_>,
        filter: Option<CampaignFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<Campaign>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.campaigns().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct CampaignMutation;

#[Object]
impl CampaignMutation {
    /// Create a campaign with its agent links and metrics row.
    async fn create_campaign(
        &self,
        ctx: &Context<'_>,
        input: CreateCampaignInput,
    ) -> GqlResult<Campaign> {
        let (new, agent_ids) = input.into_new().gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.campaigns().create_with_agents(&new, &agent_ids).await.gql()
    }

    async fn update_campaign(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateCampaignInput,
    ) -> GqlResult<Campaign> {
        let repo = ctx.data::<Repository>()?;
        let mut campaign = require(repo.campaigns().get(id).await.gql()?, "campaign", id)?;
        input.apply_to(&mut campaign);
        campaign.validate().gql()?;
        repo.campaigns().update(&campaign).await.gql()
    }

    async fn delete_campaign(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.campaigns().delete(id).await.gql()
    }
}

#[ComplexObject]
impl Campaign {
    async fn client(&self, ctx: &Context<'_>) -> GqlResult<Option<Client>> {
        let Some(client_id) = self.client_id else {
            return Ok(None);
        };
        ctx.data::<Repository>()?.clients().get(client_id).await.gql()
    }

    async fn targets(&self, ctx: &Context<'_>) -> GqlResult<Vec<TargetAudience>> {
        ctx.data::<Repository>()?.audiences().for_campaign(self.id).await.gql()
    }

    async fn messages(&self, ctx: &Context<'_>) -> GqlResult<Vec<MessageTemplate>> {
        ctx.data::<Repository>()?.templates().for_campaign(self.id).await.gql()
    }

    async fn ai_agents(&self, ctx: &Context<'_>) -> GqlResult<Vec<AiAgent>> {
        ctx.data::<Repository>()?.agents().for_campaign(self.id).await.gql()
    }

    /// Latest metrics row, provisioned on first read.
    async fn metrics(&self, ctx: &Context<'_>) -> GqlResult<Option<CampaignMetrics>> {
        let repo = ctx.data::<Repository>()?;
        repo.campaign_metrics()
            .ensure_for_campaign(self.id)
            .await
            .map(Some)
            .gql()
    }
}
