//! Message templates used by agents for outreach

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::Channel;
use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    /// Placeholder names referenced by `content`
    pub variables: Vec<String>,
    pub channel: Channel,
    pub purpose: String,
    pub campaign_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MessageTemplate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, &self.content, &self.purpose)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessageTemplate {
    pub name: String,
    pub content: String,
    pub variables: Vec<String>,
    pub channel: Channel,
    pub purpose: String,
    pub campaign_id: Option<Uuid>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateMessageTemplateInput {
    pub name: String,
    pub content: String,
    pub variables: Option<Vec<String>>,
    pub channel: Channel,
    pub purpose: String,
    pub campaign_id: Option<Uuid>,
    pub ai_agent_ids: Option<Vec<Uuid>>,
}

impl CreateMessageTemplateInput {
    pub fn into_new(self) -> Result<(NewMessageTemplate, Vec<Uuid>), ValidationError> {
        check(&self.name, &self.content, &self.purpose)?;
        let template = NewMessageTemplate {
            name: self.name,
            content: self.content,
            variables: self.variables.unwrap_or_default(),
            channel: self.channel,
            purpose: self.purpose,
            campaign_id: self.campaign_id,
        };
        Ok((template, self.ai_agent_ids.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateMessageTemplateInput {
    pub name: Option<String>,
    pub content: Option<String>,
    pub variables: Option<Vec<String>>,
    pub channel: Option<Channel>,
    pub purpose: Option<String>,
    pub campaign_id: MaybeUndefined<Uuid>,
}

impl UpdateMessageTemplateInput {
    pub fn apply_to(self, template: &mut MessageTemplate) {
        set(&mut template.name, self.name);
        set(&mut template.content, self.content);
        set(&mut template.variables, self.variables);
        set(&mut template.channel, self.channel);
        set(&mut template.purpose, self.purpose);
        set_nullable(&mut template.campaign_id, self.campaign_id);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "MessageTemplateFilterInput")]
pub struct MessageTemplateFilter {
    pub channel: Option<Channel>,
    pub purpose: Option<String>,
    pub campaign_id: Option<Uuid>,
}

fn check(name: &str, content: &str, purpose: &str) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::non_empty("content", content)?;
    validation::non_empty("purpose", purpose)
}
