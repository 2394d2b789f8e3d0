//! Target audiences - the segment a campaign aims at

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    pub id: Uuid,
    pub name: String,
    pub industry: String,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub decision_maker_role: Option<String>,
    pub pain_points: Vec<String>,
    pub campaign_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TargetAudience {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, &self.industry)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTargetAudience {
    pub name: String,
    pub industry: String,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub decision_maker_role: Option<String>,
    pub pain_points: Vec<String>,
    pub campaign_id: Uuid,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateTargetAudienceInput {
    pub name: String,
    pub industry: String,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub decision_maker_role: Option<String>,
    pub pain_points: Option<Vec<String>>,
    pub campaign_id: Uuid,
}

impl CreateTargetAudienceInput {
    pub fn into_new(self) -> Result<NewTargetAudience, ValidationError> {
        check(&self.name, &self.industry)?;
        Ok(NewTargetAudience {
            name: self.name,
            industry: self.industry,
            company_size: self.company_size,
            location: self.location,
            decision_maker_role: self.decision_maker_role,
            pain_points: self.pain_points.unwrap_or_default(),
            campaign_id: self.campaign_id,
        })
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateTargetAudienceInput {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub company_size: MaybeUndefined<String>,
    pub location: MaybeUndefined<String>,
    pub decision_maker_role: MaybeUndefined<String>,
    pub pain_points: Option<Vec<String>>,
    pub campaign_id: Option<Uuid>,
}

impl UpdateTargetAudienceInput {
    pub fn apply_to(self, audience: &mut TargetAudience) {
        set(&mut audience.name, self.name);
        set(&mut audience.industry, self.industry);
        set_nullable(&mut audience.company_size, self.company_size);
        set_nullable(&mut audience.location, self.location);
        set_nullable(&mut audience.decision_maker_role, self.decision_maker_role);
        set(&mut audience.pain_points, self.pain_points);
        set(&mut audience.campaign_id, self.campaign_id);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "TargetAudienceFilterInput")]
pub struct TargetAudienceFilter {
    pub campaign_id: Option<Uuid>,
    pub industry: Option<String>,
}

fn check(name: &str, industry: &str) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::non_empty("industry", industry)
}
