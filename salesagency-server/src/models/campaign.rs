//! Campaigns run on behalf of a client

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::CampaignStatus;
use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

/// Campaign record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Campaign {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, self.start_date, self.end_date, self.budget)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub name: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateCampaignInput {
    pub name: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Defaults to `DRAFT`
    pub status: Option<CampaignStatus>,
    pub budget: Option<f64>,
    /// Agents linked in the same transaction as the insert
    pub ai_agent_ids: Option<Vec<Uuid>>,
}

impl CreateCampaignInput {
    pub fn into_new(self) -> Result<(NewCampaign, Vec<Uuid>), ValidationError> {
        let campaign = NewCampaign {
            name: self.name,
            description: self.description,
            client_id: self.client_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.unwrap_or_default(),
            budget: self.budget,
        };
        check(&campaign.name, campaign.start_date, campaign.end_date, campaign.budget)?;
        Ok((campaign, self.ai_agent_ids.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateCampaignInput {
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
    pub client_id: MaybeUndefined<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: MaybeUndefined<NaiveDate>,
    pub status: Option<CampaignStatus>,
    pub budget: MaybeUndefined<f64>,
}

impl UpdateCampaignInput {
    pub fn apply_to(self, campaign: &mut Campaign) {
        set(&mut campaign.name, self.name);
        set_nullable(&mut campaign.description, self.description);
        set_nullable(&mut campaign.client_id, self.client_id);
        set(&mut campaign.start_date, self.start_date);
        set_nullable(&mut campaign.end_date, self.end_date);
        set(&mut campaign.status, self.status);
        set_nullable(&mut campaign.budget, self.budget);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "CampaignFilterInput")]
pub struct CampaignFilter {
    pub status: Option<Vec<CampaignStatus>>,
    pub client_id: Option<Uuid>,
    /// Inclusive lower bound on `startDate`
    pub start_after: Option<NaiveDate>,
    /// Inclusive upper bound on `startDate`
    pub start_before: Option<NaiveDate>,
}

fn check(
    name: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    budget: Option<f64>,
) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    if let Some(budget) = budget {
        validation::non_negative("budget", budget)?;
    }
    if matches!(end_date, Some(end) if end < start_date) {
        return Err(ValidationError::Inconsistent {
            field: "endDate",
            reason: "must not be before startDate",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn input() -> CreateCampaignInput {
        CreateCampaignInput {
            name: "Spring outbound".into(),
            description: None,
            client_id: None,
            start_date: date(3, 1),
            end_date: Some(date(5, 31)),
            status: None,
            budget: Some(12_000.0),
            ai_agent_ids: None,
        }
    }

    #[test]
    fn defaults_to_draft() {
        let (campaign, agents) = input().into_new().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert!(agents.is_empty());
    }

    #[test]
    fn end_before_start_rejected() {
        let err = CreateCampaignInput {
            end_date: Some(date(2, 1)),
            ..input()
        }
        .into_new()
        .unwrap_err();
        assert!(matches!(err, ValidationError::Inconsistent { field: "endDate", .. }));
    }

    #[test]
    fn same_day_campaign_allowed() {
        assert!(CreateCampaignInput {
            end_date: Some(date(3, 1)),
            ..input()
        }
        .into_new()
        .is_ok());
    }

    #[test]
    fn negative_budget_rejected() {
        let err = CreateCampaignInput {
            budget: Some(-1.0),
            ..input()
        }
        .into_new()
        .unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: "budget" });
    }

    #[test]
    fn moving_start_past_end_fails_validation() {
        let (new, _) = input().into_new().unwrap();
        let mut campaign = Campaign {
            id: Uuid::new_v4(),
            name: new.name,
            description: None,
            client_id: Some(Uuid::new_v4()),
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
            budget: new.budget,
            created_at: Utc::now(),
            updated_at: None,
        };
        UpdateCampaignInput {
            start_date: Some(date(6, 1)),
            client_id: MaybeUndefined::Null,
            ..Default::default()
        }
        .apply_to(&mut campaign);

        assert_eq!(campaign.client_id, None);
        assert!(campaign.validate().is_err());
    }
}
