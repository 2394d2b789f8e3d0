//! Services the agency sells to clients

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
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Service {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, self.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub features: Option<Vec<String>>,
}

impl CreateServiceInput {
    pub fn into_new(self) -> Result<NewService, ValidationError> {
        check(&self.name, self.price)?;
        Ok(NewService {
            name: self.name,
            description: self.description,
            price: self.price,
            features: self.features.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateServiceInput {
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
    pub price: Option<f64>,
    pub features: Option<Vec<String>>,
}

impl UpdateServiceInput {
    pub fn apply_to(self, service: &mut Service) {
        set(&mut service.name, self.name);
        set_nullable(&mut service.description, self.description);
        set(&mut service.price, self.price);
        set(&mut service.features, self.features);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "ServiceFilterInput")]
pub struct ServiceFilter {
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

fn check(name: &str, price: f64) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::non_negative("price", price)
}
