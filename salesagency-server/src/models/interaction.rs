//! Interactions - touchpoints logged against a lead

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::{Channel, InteractionStatus, InteractionType};
use super::patch::{set, set_nullable};

/// Interaction record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: Uuid,
    pub lead_id: Uuid,
    #[sqlx(rename = "type")]
    #[graphql(name = "type")]
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub channel: Channel,
    pub message: Option<String>,
    pub ai_agent_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub response: Option<String>,
    pub status: InteractionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub lead_id: Uuid,
    pub kind: InteractionType,
    pub channel: Channel,
    pub message: Option<String>,
    pub ai_agent_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub response: Option<String>,
    pub status: InteractionStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateInteractionInput {
    pub lead_id: Uuid,
    #[graphql(name = "type")]
    pub kind: InteractionType,
    pub channel: Channel,
    pub message: Option<String>,
    pub ai_agent_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    /// Defaults to the time of the request
    pub timestamp: Option<DateTime<Utc>>,
    pub response: Option<String>,
    /// Defaults to `PENDING`
    pub status: Option<InteractionStatus>,
    pub notes: Option<String>,
}

impl CreateInteractionInput {
    /// Interactions carry no free-form required text, so nothing can fail here.
    pub fn into_new(self, now: DateTime<Utc>) -> NewInteraction {
        NewInteraction {
            lead_id: self.lead_id,
            kind: self.kind,
            channel: self.channel,
            message: self.message,
            ai_agent_id: self.ai_agent_id,
            template_id: self.template_id,
            timestamp: self.timestamp.unwrap_or(now),
            response: self.response,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateInteractionInput {
    #[graphql(name = "type")]
    pub kind: Option<InteractionType>,
    pub channel: Option<Channel>,
    pub message: MaybeUndefined<String>,
    pub ai_agent_id: MaybeUndefined<Uuid>,
    pub template_id: MaybeUndefined<Uuid>,
    pub timestamp: Option<DateTime<Utc>>,
    pub response: MaybeUndefined<String>,
    pub status: Option<InteractionStatus>,
    pub notes: MaybeUndefined<String>,
}

impl UpdateInteractionInput {
    pub fn apply_to(self, interaction: &mut Interaction) {
        set(&mut interaction.kind, self.kind);
        set(&mut interaction.channel, self.channel);
        set_nullable(&mut interaction.message, self.message);
        set_nullable(&mut interaction.ai_agent_id, self.ai_agent_id);
        set_nullable(&mut interaction.template_id, self.template_id);
        set(&mut interaction.timestamp, self.timestamp);
        set_nullable(&mut interaction.response, self.response);
        set(&mut interaction.status, self.status);
        set_nullable(&mut interaction.notes, self.notes);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "InteractionFilterInput")]
pub struct InteractionFilter {
    pub lead_id: Option<Uuid>,
    pub ai_agent_id: Option<Uuid>,
    #[graphql(name = "type")]
    pub kind: Option<InteractionType>,
    pub channel: Option<Channel>,
    pub status: Option<Vec<InteractionStatus>>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(lead_id: Uuid) -> CreateInteractionInput {
        CreateInteractionInput {
            lead_id,
            kind: InteractionType::Outreach,
            channel: Channel::Email,
            message: Some("Hi Jane".into()),
            ai_agent_id: None,
            template_id: None,
            timestamp: None,
            response: None,
            status: None,
            notes: None,
        }
    }

    #[test]
    fn defaults_to_pending_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let lead_id = Uuid::new_v4();
        let new = input(lead_id).into_new(now);
        assert_eq!(new.lead_id, lead_id);
        assert_eq!(new.status, InteractionStatus::Pending);
        assert_eq!(new.timestamp, now);
    }

    #[test]
    fn explicit_timestamp_wins() {
        let sent = Utc.with_ymd_and_hms(2024, 4, 30, 17, 0, 0).unwrap();
        let new = CreateInteractionInput {
            timestamp: Some(sent),
            status: Some(InteractionStatus::Sent),
            ..input(Uuid::new_v4())
        }
        .into_new(Utc::now());
        assert_eq!(new.timestamp, sent);
        assert_eq!(new.status, InteractionStatus::Sent);
    }

    #[test]
    fn serializes_kind_as_type() {
        let new = input(Uuid::new_v4()).into_new(Utc::now());
        let interaction = Interaction {
            id: Uuid::new_v4(),
            lead_id: new.lead_id,
            kind: InteractionType::FollowUp,
            channel: new.channel,
            message: None,
            ai_agent_id: None,
            template_id: None,
            timestamp: new.timestamp,
            response: None,
            status: new.status,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "FOLLOW_UP");
        assert!(json.get("kind").is_none());
    }
}
