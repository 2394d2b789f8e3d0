use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    Campaign, CreateMessageTemplateInput, MessageTemplate, MessageTemplateFilter, Page,
    UpdateMessageTemplateInput,
};

#[derive(Default)]
pub struct TemplateQuery;

#[Object]
impl TemplateQuery {
    async fn message_template(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> GqlResult<Option<MessageTemplate>> {
        ctx.data::<Repository>()?.templates().get(id).await.gql()
    }

    async fn message_templates(
        &self,
        ctx: &Context<'_>,
        filter: Option<MessageTemplateFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<MessageTemplate>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.templates().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct TemplateMutation;

#[Object]
impl TemplateMutation {
    async fn create_message_template(
        &self,
        ctx: &Context<'_>,
        input: CreateMessageTemplateInput,
    ) -> GqlResult<MessageTemplate> {
        let (new, agent_ids) = input.into_new().gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.templates().create_with_agents(&new, &agent_ids).await.gql()
    }

    async fn update_message_template(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateMessageTemplateInput,
    ) -> GqlResult<MessageTemplate> {
        let repo = ctx.data::<Repository>()?;
        let mut template = require(repo.templates().get(id).await.gql()?, "message template", id)?;
        input.apply_to(&mut template);
        template.validate().gql()?;
        repo.templates().update(&template).await.gql()
    }

    async fn delete_message_template(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.templates().delete(id).await.gql()
    }
}

#[ComplexObject]
impl MessageTemplate {
    async fn campaign(&self, ctx: &Context<'_>) -> GqlResult<Option<Campaign>> {
        let Some(campaign_id) = self.campaign_id else {
            return Ok(None);
        };
        ctx.data::<Repository>()?.campaigns().get(campaign_id).await.gql()
    }
}
