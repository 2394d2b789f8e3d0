use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    Campaign, CreateTargetAudienceInput, Page, TargetAudience, TargetAudienceFilter,
    UpdateTargetAudienceInput,
};

#[derive(Default)]
pub struct AudienceQuery;

#[Object]
impl AudienceQuery {
    async fn target_audience(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> GqlResult<Option<TargetAudience>> {
        ctx.data::<Repository>()?.audiences().get(id).await.gql()
    }

    async fn target_audiences(
        &self,
        ctx: &Context<'_>,
        filter: Option<TargetAudienceFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<TargetAudience>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.audiences().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct AudienceMutation;

#[Object]
impl AudienceMutation {
    async fn create_target_audience(
        &self,
        ctx: &Context<'_>,
        input: CreateTargetAudienceInput,
    ) -> GqlResult<TargetAudience> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.audiences().create(&new).await.gql()
    }

    async fn update_target_audience(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateTargetAudienceInput,
    ) -> GqlResult<TargetAudience> {
        let repo = ctx.data::<Repository>()?;
        let mut audience = require(repo.audiences().get(id).await.gql()?, "target audience", id)?;
        input.apply_to(&mut audience);
        audience.validate().gql()?;
        repo.audiences().update(&audience).await.gql()
    }

    async fn delete_target_audience(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.audiences().delete(id).await.gql()
    }
}

#[ComplexObject]
impl TargetAudience {
    async fn campaign(&self, ctx: &Context<'_>) -> GqlResult<Option<Campaign>> {
        ctx.data::<Repository>()?.campaigns().get(self.campaign_id).await.gql()
    }
}
