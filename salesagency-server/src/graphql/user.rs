use async_graphql::{Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{CreateUserInput, Page, UpdateUserInput, User, UserFilter};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<Option<User>> {
        ctx.data::<Repository>()?.users().get(id).await.gql()
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        filter: Option<UserFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<User>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.users().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> GqlResult<User> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.users().create(&new).await.gql()
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateUserInput,
    ) -> GqlResult<User> {
        let repo = ctx.data::<Repository>()?;
        let mut user = require(repo.users().get(id).await.gql()?, "user", id)?;
        input.apply_to(&mut user);
        user.validate().gql()?;
        repo.users().update(&user).await.gql()
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.users().delete(id).await.gql()
    }
}
