//! Leads - prospects moving through the sales pipeline

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::LeadStatus;
use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

/// Intent score given to a lead created without one.
pub const DEFAULT_INTENT_SCORE: f64 = 0.5;

/// Lead record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: LeadStatus,
    /// Expected in `[0.0, 1.0]`
    pub intent_score: f64,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
    pub next_follow_up: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, &self.email, self.intent_score)
    }
}

/// Column values for a lead that hasn't been inserted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: LeadStatus,
    pub intent_score: f64,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
    pub next_follow_up: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateLeadInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    /// Defaults to `NEW`
    pub status: Option<LeadStatus>,
    /// Defaults to 0.5
    pub intent_score: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
    pub next_follow_up: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl CreateLeadInput {
    /// Apply defaults and validate.
    pub fn into_new(self) -> Result<NewLead, ValidationError> {
        let lead = NewLead {
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            position: self.position,
            status: self.status.unwrap_or_default(),
            intent_score: self.intent_score.unwrap_or(DEFAULT_INTENT_SCORE),
            tags: self.tags.unwrap_or_default(),
            source: self.source,
            last_contact: self.last_contact,
            next_follow_up: self.next_follow_up,
            notes: self.notes,
        };
        check(&lead.name, &lead.email, lead.intent_score)?;
        Ok(lead)
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateLeadInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: MaybeUndefined<String>,
    pub company: MaybeUndefined<String>,
    pub position: MaybeUndefined<String>,
    pub status: Option<LeadStatus>,
    pub intent_score: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub source: MaybeUndefined<String>,
    pub last_contact: MaybeUndefined<DateTime<Utc>>,
    pub next_follow_up: MaybeUndefined<DateTime<Utc>>,
    pub notes: MaybeUndefined<String>,
}

impl UpdateLeadInput {
    /// Merge the provided fields into `lead`, leaving the rest untouched.
    pub fn apply_to(self, lead: &mut Lead) {
        set(&mut lead.name, self.name);
        set(&mut lead.email, self.email);
        set_nullable(&mut lead.phone, self.phone);
        set_nullable(&mut lead.company, self.company);
        set_nullable(&mut lead.position, self.position);
        set(&mut lead.status, self.status);
        set(&mut lead.intent_score, self.intent_score);
        set(&mut lead.tags, self.tags);
        set_nullable(&mut lead.source, self.source);
        set_nullable(&mut lead.last_contact, self.last_contact);
        set_nullable(&mut lead.next_follow_up, self.next_follow_up);
        set_nullable(&mut lead.notes, self.notes);
    }
}

/// Conjunctive lead filter; absent fields impose no constraint.
#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "LeadFilterInput")]
pub struct LeadFilter {
    /// Matches any of the listed statuses
    pub status: Option<Vec<LeadStatus>>,
    pub min_intent_score: Option<f64>,
    /// Matches leads sharing at least one tag
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub last_contact_after: Option<DateTime<Utc>>,
    pub last_contact_before: Option<DateTime<Utc>>,
}

fn check(name: &str, email: &str, intent_score: f64) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::email("email", email)?;
    validation::unit_interval("intentScore", intent_score)
}
