//! GraphQL schema
//!
//! Query and mutation roots are merged from one object per entity. Entity
//! types double as GraphQL objects; their relationship fields live next to the
//! entity's queries as `#[ComplexObject]` impls. The `Repository` is injected
//! once through schema data.

mod agent;
mod audience;
mod campaign;
mod client;
mod interaction;
mod lead;
mod service;
mod stats;
mod template;
mod training;
mod user;

use async_graphql::{EmptySubscription, ErrorExtensions, MergedObject, Result as GqlResult, Schema};
use uuid::Uuid;

use crate::db::Repository;
use crate::error::ApiError;

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    lead::LeadQuery,
    client::ClientQuery,
    agent::AgentQuery,
    campaign::CampaignQuery,
    interaction::InteractionQuery,
    template::TemplateQuery,
    audience::AudienceQuery,
    service::ServiceQuery,
    stats::StatsQuery,
    user::UserQuery,
    training::TrainingQuery,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    lead::LeadMutation,
    client::ClientMutation,
    agent::AgentMutation,
    campaign::CampaignMutation,
    interaction::InteractionMutation,
    template::TemplateMutation,
    audience::AudienceMutation,
    service::ServiceMutation,
    stats::StatsMutation,
    user::UserMutation,
    training::TrainingMutation,
);

/// Build the schema with `repo` available to every resolver.
pub fn build_schema(repo: Repository) -> CrmSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(repo)
        .finish()
}

/// Schema definition language for the full API. Needs no database.
pub fn sdl() -> String {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .finish()
        .sdl()
}

/// Turn a missing update target into a `NOT_FOUND` error.
pub(crate) fn require<T>(found: Option<T>, resource: &'static str, id: Uuid) -> GqlResult<T> {
    found.ok_or_else(|| ApiError::not_found(resource, id).extend())
}
