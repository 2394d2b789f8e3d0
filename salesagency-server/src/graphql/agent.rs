//! AI agent queries, mutations and lifecycle controls

use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    AgentFilter, AgentStats, AgentStatus, AiAgent, Campaign, CreateAiAgentInput, Lead,
    MessageTemplate, Page, UpdateAiAgentInput,
};

#[derive(Default)]
pub struct AgentQuery;

#[Object]
impl AgentQuery {
    #[graphql(name = "aiAgent")]
    async fn ai_agent(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<AiAgent>> {
        ctx.data::<Repository>()?.agents().get(id).await.gql()
    }

    #[graphql(name = "aiAgents")]
    async fn ai_agents(
        &self,
        ctx: &Context<'_>,
        filter: Option<AgentFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<AiAgent>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.agents().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct AgentMutation;

#[Object]
impl AgentMutation {
    /// Create an agent together with its lifetime stats row.
    #[graphql(name = "createAIAgent")]
    async fn create_ai_agent(
        &self,
        ctx: &Context<'_>,
        input: CreateAiAgentInput,
    ) -> GqlResult<AiAgent> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.agents().create(&new).await.gql()
    }

    #[graphql(name = "updateAIAgent")]
    async fn update_ai_agent(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateAiAgentInput,
    ) -> GqlResult<AiAgent> {
        let repo = ctx.data::<Repository>()?;
        let mut agent = require(repo.agents().get(id).await.gql()?, "ai agent", id)?;
        input.apply_to(&mut agent);
        agent.validate().gql()?;
        repo.agents().update(&agent).await.gql()
    }

    #[graphql(name = "deleteAIAgent")]
    async fn delete_ai_agent(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.agents().delete(id).await.gql()
    }

    /// Mark the agent RUNNING and stamp `lastRun`. False if no such agent.
    #[graphql(name = "triggerAIAgentRun")]
    async fn trigger_ai_agent_run(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.agents().trigger_run(id).await.gql()
    }

    #[graphql(name = "pauseAIAgent")]
    async fn pause_ai_agent(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        let repo = ctx.data::<Repository>()?;
        repo.agents().set_status(id, AgentStatus::Paused).await.gql()
    }

    #[graphql(name = "resumeAIAgent")]
    async fn resume_ai_agent(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        let repo = ctx.data::<Repository>()?;
        repo.agents().set_status(id, AgentStatus::Active).await.gql()
    }
}

#[ComplexObject]
impl AiAgent {
    async fn leads(&self, ctx: &Context<'_>) -> GqlResult<Vec<Lead>> {
        ctx.data::<Repository>()?.leads().for_agent(self.id).await.gql()
    }

    async fn campaigns(&self, ctx: &Context<'_>) -> GqlResult<Vec<Campaign>> {
        ctx.data::<Repository>()?.campaigns().for_agent(self.id).await.gql()
    }

    async fn templates(&self, ctx: &Context<'_>) -> GqlResult<Vec<MessageTemplate>> {
        ctx.data::<Repository>()?.templates().for_agent(self.id).await.gql()
    }

    /// Latest stats row, provisioned on first read.
    async fn stats(&self, ctx: &Context<'_>) -> GqlResult<Option<AgentStats>> {
        let repo = ctx.data::<Repository>()?;
        repo.agent_stats().ensure_for_agent(self.id).await.map(Some).gql()
    }
}
