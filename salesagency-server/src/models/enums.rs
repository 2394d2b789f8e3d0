//! Status and kind enums
//!
//! Each enum maps onto a native Postgres enum type (see migrations) and onto a
//! GraphQL enum with SCREAMING_SNAKE_CASE values. Transitions between states
//! are not restricted: any value may be written over any other.

use async_graphql::Enum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "client_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    Onboarding,
    #[default]
    Active,
    Paused,
    Churned,
}

/// Lifecycle of an automation agent. `Running` is set by a trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "agent_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    #[default]
    Active,
    Paused,
    Running,
    Inactive,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Active,
    Paused,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "interaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    Outreach,
    FollowUp,
    Reply,
    Meeting,
    Note,
}

/// Delivery channel shared by interactions and message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "channel", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Email,
    Sms,
    Linkedin,
    Phone,
    Whatsapp,
    Web,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "interaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionStatus {
    #[default]
    Pending,
    Sent,
    Delivered,
    Opened,
    Replied,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    SalesRep,
    Viewer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, sqlx::Type)]
#[sqlx(type_name = "training_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_defaults() {
        assert_eq!(LeadStatus::default(), LeadStatus::New);
        assert_eq!(ClientStatus::default(), ClientStatus::Active);
        assert_eq!(AgentStatus::default(), AgentStatus::Active);
        assert_eq!(CampaignStatus::default(), CampaignStatus::Draft);
        assert_eq!(InteractionStatus::default(), InteractionStatus::Pending);
        assert_eq!(UserRole::default(), UserRole::SalesRep);
        assert_eq!(TrainingStatus::default(), TrainingStatus::Draft);
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&InteractionType::FollowUp).unwrap(),
            "\"FOLLOW_UP\""
        );
        assert_eq!(serde_json::to_string(&UserRole::SalesRep).unwrap(), "\"SALES_REP\"");
        let status: LeadStatus = serde_json::from_str("\"NEGOTIATION\"").unwrap();
        assert_eq!(status, LeadStatus::Negotiation);
    }
}
