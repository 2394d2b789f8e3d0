use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use chrono::Utc;
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    CreateInteractionInput, Interaction, InteractionFilter, Lead, Page, UpdateInteractionInput,
};

#[derive(Default)]
pub struct InteractionQuery;

#[Object]
impl InteractionQuery {
    async fn interaction(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<Interaction>> {
        ctx.data::<Repository>()?.interactions().get(id).await.gql()
    }

    async fn interactions(
        &self,
        ctx: &Context<'_>,
        filter: Option<InteractionFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<Interaction>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.interactions()
            .list(&filter.unwrap_or_default(), page)
            .await
            .gql()
    }
}

#[derive(Default)]
pub struct InteractionMutation;

#[Object]
impl InteractionMutation {
    async fn create_interaction(
        &self,
        ctx: &Context<'_>,
        input: CreateInteractionInput,
    ) -> GqlResult<Interaction> {
        let new = input.into_new(Utc::now());
        ctx.data::<Repository>()?.interactions().create(&new).await.gql()
    }

    async fn update_interaction(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateInteractionInput,
    ) -> GqlResult<Interaction> {
        let repo = ctx.data::<Repository>()?;
        let mut interaction =
            require(repo.interactions().get(id).await.gql()?, "interaction", id)?;
        input.apply_to(&mut interaction);
        repo.interactions().update(&interaction).await.gql()
    }

    async fn delete_interaction(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.interactions().delete(id).await.gql()
    }
}

#[ComplexObject]
impl Interaction {
    async fn lead(&self, ctx: &Context<'_>) -> GqlResult<Option<Lead>> {
        ctx.data::<Repository>()?.leads().get(self.lead_id).await.gql()
    }
}
