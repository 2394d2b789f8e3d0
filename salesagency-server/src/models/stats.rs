//! Aggregate counters for agents and campaigns
//!
//! Rows are keyed by `(owner, period)`. Only the `"all"` period is provisioned
//! automatically; other periods are written by whoever computes them.

use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::patch::set;
use super::validation::{self, ValidationError};

/// Period label for the lifetime aggregate row.
pub const ALL_TIME: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub leads_engaged: i32,
    pub messages_delivered: i32,
    pub response_rate: f64,
    pub conversion_rate: f64,
    /// Mean seconds between outreach and reply
    pub avg_response_time: f64,
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AgentStats {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::non_negative_int("leadsEngaged", self.leads_engaged)?;
        validation::non_negative_int("messagesDelivered", self.messages_delivered)?;
        validation::unit_interval("responseRate", self.response_rate)?;
        validation::unit_interval("conversionRate", self.conversion_rate)?;
        validation::non_negative("avgResponseTime", self.avg_response_time)?;
        validation::non_empty("period", &self.period)
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateAgentStatsInput {
    pub leads_engaged: Option<i32>,
    pub messages_delivered: Option<i32>,
    pub response_rate: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub avg_response_time: Option<f64>,
}

impl UpdateAgentStatsInput {
    pub fn apply_to(self, stats: &mut AgentStats) {
        set(&mut stats.leads_engaged, self.leads_engaged);
        set(&mut stats.messages_delivered, self.messages_delivered);
        set(&mut stats.response_rate, self.response_rate);
        set(&mut stats.conversion_rate, self.conversion_rate);
        set(&mut stats.avg_response_time, self.avg_response_time);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "AgentStatsFilterInput")]
pub struct AgentStatsFilter {
    pub agent_id: Option<Uuid>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub leads_targeted: i32,
    pub messages_sent: i32,
    pub responses: i32,
    pub conversions: i32,
    pub response_rate: f64,
    pub conversion_rate: f64,
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CampaignMetrics {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::non_negative_int("leadsTargeted", self.leads_targeted)?;
        validation::non_negative_int("messagesSent", self.messages_sent)?;
        validation::non_negative_int("responses", self.responses)?;
        validation::non_negative_int("conversions", self.conversions)?;
        validation::unit_interval("responseRate", self.response_rate)?;
        validation::unit_interval("conversionRate", self.conversion_rate)?;
        validation::non_empty("period", &self.period)
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateCampaignMetricsInput {
    pub leads_targeted: Option<i32>,
    pub messages_sent: Option<i32>,
    pub responses: Option<i32>,
    pub conversions: Option<i32>,
    pub response_rate: Option<f64>,
    pub conversion_rate: Option<f64>,
}

impl UpdateCampaignMetricsInput {
    pub fn apply_to(self, metrics: &mut CampaignMetrics) {
        set(&mut metrics.leads_targeted, self.leads_targeted);
        set(&mut metrics.messages_sent, self.messages_sent);
        set(&mut metrics.responses, self.responses);
        set(&mut metrics.conversions, self.conversions);
        set(&mut metrics.response_rate, self.response_rate);
        set(&mut metrics.conversion_rate, self.conversion_rate);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "CampaignMetricsFilterInput")]
pub struct CampaignMetricsFilter {
    pub campaign_id: Option<Uuid>,
    pub period: Option<String>,
}
