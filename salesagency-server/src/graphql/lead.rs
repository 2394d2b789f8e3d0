use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    AiAgent, CreateLeadInput, Interaction, Lead, LeadFilter, Page, UpdateLeadInput,
};

#[derive(Default)]
pub struct LeadQuery;

#[Object]
impl LeadQuery {
    async fn lead(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<Lead>> {
        ctx.data::<Repository>()?.leads().get(id).await.gql()
    }

    async fn leads(
        &self,
        ctx: &Context<'_>,
        filter: Option<LeadFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<Lead>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.leads().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct LeadMutation;

#[Object]
impl LeadMutation {
    async fn create_lead(&self, ctx: &Context<'_>, input: CreateLeadInput) -> GqlResult<Lead> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.leads().create(&new).await.gql()
    }

    async fn update_lead(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateLeadInput,
    ) -> GqlResult<Lead> {
        let repo = ctx.data::<Repository>()?;
        let mut lead = require(repo.leads().get(id).await.gql()?, "lead", id)?;
        input.apply_to(&mut lead);
        lead.validate().gql()?;
        repo.leads().update(&lead).await.gql()
    }

    async fn delete_lead(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.leads().delete(id).await.gql()
    }

    /// Link a lead to an agent. Returns the lead, or null if it is gone.
    #[graphql(name = "assignLeadToAIAgent")]
    async fn assign_lead_to_ai_agent(
        &self,
        ctx: &Context<'_>,
        lead_id: Uuid,
        ai_agent_id: Uuid,
    ) -> GqlResult<Option<Lead>> {
        let repo = ctx.data::<Repository>()?;
        repo.leads().assign_to_agent(lead_id, ai_agent_id).await.gql()
    }
}

#[ComplexObject]
impl Lead {
    async fn interactions(&self, ctx: &Context<'_>) -> GqlResult<Vec<Interaction>> {
        ctx.data::<Repository>()?.interactions().for_lead(self.id).await.gql()
    }

    async fn ai_agents(&self, ctx: &Context<'_>) -> GqlResult<Vec<AiAgent>> {
        ctx.data::<Repository>()?.agents().for_lead(self.id).await.gql()
    }
}
