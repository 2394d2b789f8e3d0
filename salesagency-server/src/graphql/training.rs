//! Training programs and their modules

use async_graphql::{ComplexObject, Context, Object, Result as GqlResult};
use uuid::Uuid;

use super::require;
use crate::db::Repository;
use crate::error::ResultExt;
use crate::models::{
    CreateTrainingModuleInput, CreateTrainingProgramInput, Page, TrainingModule,
    TrainingModuleFilter, TrainingProgram, TrainingProgramFilter, UpdateTrainingModuleInput,
    UpdateTrainingProgramInput,
};

#[derive(Default)]
pub struct TrainingQuery;

#[Object]
impl TrainingQuery {
    async fn training_program(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> GqlResult<Option<TrainingProgram>> {
        ctx.data::<Repository>()?.programs().get(id).await.gql()
    }

    async fn training_programs(
        &self,
        ctx: &Context<'_>,
        filter: Option<TrainingProgramFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<TrainingProgram>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.programs().list(&filter.unwrap_or_default(), page).await.gql()
    }

    async fn training_module(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> GqlResult<Option<TrainingModule>> {
        ctx.data::<Repository>()?.modules().get(id).await.gql()
    }

    /// Modules ordered by position.
    async fn training_modules(
        &self,
        ctx: &Context<'_>,
        filter: Option<TrainingModuleFilter>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> GqlResult<Vec<TrainingModule>> {
        let page = Page::new(limit, offset).gql()?;
        let repo = ctx.data::<Repository>()?;
        repo.modules().list(&filter.unwrap_or_default(), page).await.gql()
    }
}

#[derive(Default)]
pub struct TrainingMutation;

#[Object]
impl TrainingMutation {
    async fn create_training_program(
        &self,
        ctx: &Context<'_>,
        input: CreateTrainingProgramInput,
    ) -> GqlResult<TrainingProgram> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.programs().create(&new).await.gql()
    }

    async fn update_training_program(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateTrainingProgramInput,
    ) -> GqlResult<TrainingProgram> {
        let repo = ctx.data::<Repository>()?;
        let mut program = require(repo.programs().get(id).await.gql()?, "training program", id)?;
        input.apply_to(&mut program);
        program.validate().gql()?;
        repo.programs().update(&program).await.gql()
    }

    /// Deletes the program's modules with it.
    async fn delete_training_program(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.programs().delete(id).await.gql()
    }

    async fn create_training_module(
        &self,
        ctx: &Context<'_>,
        input: CreateTrainingModuleInput,
    ) -> GqlResult<TrainingModule> {
        let new = input.into_new().gql()?;
        ctx.data::<Repository>()?.modules().create(&new).await.gql()
    }

    async fn update_training_module(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateTrainingModuleInput,
    ) -> GqlResult<TrainingModule> {
        let repo = ctx.data::<Repository>()?;
        let mut module = require(repo.modules().get(id).await.gql()?, "training module", id)?;
        input.apply_to(&mut module);
        module.validate().gql()?;
        repo.modules().update(&module).await.gql()
    }

    async fn delete_training_module(&self, ctx: &Context<'_>, id: Uuid) -> GqlResult<bool> {
        ctx.data::<Repository>()?.modules().delete(id).await.gql()
    }
}

#[ComplexObject]
impl TrainingProgram {
    async fn modules(&self, ctx: &Context<'_>) -> GqlResult<Vec<TrainingModule>> {
        ctx.data::<Repository>()?.modules().for_program(self.id).await.gql()
    }
}

#[ComplexObject]
impl TrainingModule {
    async fn program(&self, ctx: &Context<'_>) -> GqlResult<Option<TrainingProgram>> {
        ctx.data::<Repository>()?.programs().get(self.program_id).await.gql()
    }
}
