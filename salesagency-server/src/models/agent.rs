//! AI agents - automation records that work leads and campaigns

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::AgentStatus;
use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

/// AI agent record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex, name = "AIAgent")]
#[serde(rename_all = "camelCase")]
pub struct AiAgent {
    pub id: Uuid,
    pub name: String,
    pub purpose: String,
    pub description: Option<String>,
    pub status: AgentStatus,
    pub last_run: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AiAgent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, &self.purpose)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAiAgent {
    pub name: String,
    pub purpose: String,
    pub description: Option<String>,
    pub status: AgentStatus,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "CreateAIAgentInput")]
pub struct CreateAiAgentInput {
    pub name: String,
    pub purpose: String,
    pub description: Option<String>,
    /// Defaults to `ACTIVE`
    pub status: Option<AgentStatus>,
}

impl CreateAiAgentInput {
    pub fn into_new(self) -> Result<NewAiAgent, ValidationError> {
        check(&self.name, &self.purpose)?;
        Ok(NewAiAgent {
            name: self.name,
            purpose: self.purpose,
            description: self.description,
            status: self.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "UpdateAIAgentInput")]
pub struct UpdateAiAgentInput {
    pub name: Option<String>,
    pub purpose: Option<String>,
    pub description: MaybeUndefined<String>,
    pub status: Option<AgentStatus>,
}

impl UpdateAiAgentInput {
    pub fn apply_to(self, agent: &mut AiAgent) {
        set(&mut agent.name, self.name);
        set(&mut agent.purpose, self.purpose);
        set_nullable(&mut agent.description, self.description);
        set(&mut agent.status, self.status);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "AIAgentFilterInput")]
pub struct AgentFilter {
    pub status: Option<Vec<AgentStatus>>,
    pub purpose: Option<String>,
}

fn check(name: &str, purpose: &str) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::non_empty("purpose", purpose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_agent_is_active() {
        let agent = CreateAiAgentInput {
            name: "Qualifier".into(),
            purpose: "lead qualification".into(),
            ..Default::default()
        }
        .into_new()
        .unwrap();
        assert_eq!(agent.status, AgentStatus::Active);
    }

    #[test]
    fn any_status_may_follow_any_other() {
        let mut agent = AiAgent {
            id: Uuid::new_v4(),
            name: "Qualifier".into(),
            purpose: "lead qualification".into(),
            description: Some("first pass".into()),
            status: AgentStatus::Error,
            last_run: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        UpdateAiAgentInput {
            status: Some(AgentStatus::Running),
            ..Default::default()
        }
        .apply_to(&mut agent);
        assert_eq!(agent.status, AgentStatus::Running);
        assert_eq!(agent.description.as_deref(), Some("first pass"));
    }
}
