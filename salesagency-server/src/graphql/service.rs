use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    Client, CreateServiceInput, Page, Service, ServiceFilter, UpdateServiceInput,
};

#[derive(Default)]
pub struct ServiceQuery;

#[Object]
impl ServiceQuery {
    async fn service(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<Service>> {
        ctx.data::<Repository>()?.services().get(id).await.gql()
    }

    async fn services(
        &self,
        ctx: &Context<'_>,
        filter: Option<ServiceFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<Service>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.services().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct ServiceMutation;

#[Object]
impl ServiceMutation {
    async fn create_service(&self, ctx: &Context<'_>, input: CreateServiceInput) -> GqlResult<Service> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.services().create(&new).await.gql()
    }

    async fn update_service(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateServiceInput,
    ) -> GqlResult<Service> {
        let repo = ctx.data::<Repository>()?;
        let mut service = require(repo.services().get(id).await.gql()?, "service", id)?;
        input.apply_to(&mut service);
        service.validate().gql()?;
        repo.services().update(&service).await.gql()
    }

    async fn delete_service(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.services().delete(id).await.gql()
    }
}

#[ComplexObject]
impl Service {
    async fn clients(&self, ctx: &Context<'_>) -> GqlResult<Vec<Client>> {
        ctx.data::<Repository>()?.clients().for_service(self.id).await.gql()
    }
}
