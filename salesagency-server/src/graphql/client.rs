//! Client queries and mutations, including service assignment

use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    Campaign, Client, ClientFilter, CreateClientInput, Page, Service, UpdateClientInput,
};

#[derive(Default)]
pub struct ClientQuery;

#[Object]
impl ClientQuery {
    async fn client(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<Client>> {
        ctx.data::<Repository>()?.clients().get(id).await.gql()
    }

    async fn clients(
        &self,
        ctx: &Context<'_>,
        filter: Option<ClientFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<Client>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.clients().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct ClientMutation;

#[Object]
impl ClientMutation {
    /// Create a client, subscribing it to `serviceIds` in the same transaction.
    async fn create_client(&self, ctx: &Context<'_>, input: CreateClientInput) -> GqlResult<Client> {
        let (new, service_ids) = input.into_new().gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.clients().create_with_services(&new, &service_ids).await.gql()
    }

    async fn update_client(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateClientInput,
    ) -> GqlResult<Client> {
        let repo = ctx.data::<Repository>()?;
        let mut client = require(repo.clients().get(id).await.gql()?, "client", id)?;
        input.apply_to(&mut client);
        client.validate().gql()?;
        repo.clients().update(&client).await.gql()
    }

    async fn delete_client(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.clients().delete(id).await.gql()
    }

    /// Subscribe a client to services; all links are written or none.
    async fn assign_services_to_client(
        &self,
        ctx: &Context<'_>,
        client_id: Uuid,
        service_ids: Vec<Uuid>,
    ) -> GqlResult<Client> {
        let repo = ctx.data::<Repository>()?;
        let client = require(repo.clients().get(client_id).await.gql()?, "client", client_id)?;
        repo.clients().assign_services(client.id, &service_ids).await.gql()?;
        Ok(client)
    }
}

#[ComplexObject]
impl Client {
    async fn active_services(&self, ctx: &Context<'_>) -> GqlResult<Vec<Service>> {
        ctx.data::<Repository>()?.services().for_client(self.id).await.gql()
    }

    async fn campaigns(&self, ctx: &Context<'_>) -> GqlResult<Vec<Campaign>> {
        ctx.data::<Repository>()?.campaigns().for_client(self.id).await.gql()
    }
}
