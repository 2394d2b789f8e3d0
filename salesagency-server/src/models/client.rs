//! Clients - companies the agency works for

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::ClientStatus;
use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

/// Client record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub industry: String,
    pub website: Option<String>,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub start_date: NaiveDate,
    pub status: ClientStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, &self.industry, &self.contact_person, &self.email)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub industry: String,
    pub website: Option<String>,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub start_date: NaiveDate,
    pub status: ClientStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateClientInput {
    pub name: String,
    pub industry: String,
    pub website: Option<String>,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub start_date: NaiveDate,
    /// Defaults to `ACTIVE`
    pub status: Option<ClientStatus>,
    pub notes: Option<String>,
    /// Services attached in the same transaction as the insert
    pub service_ids: Option<Vec<Uuid>>,
}

impl CreateClientInput {
    /// Split into the row to insert and the services to link.
    pub fn into_new(self) -> Result<(NewClient, Vec<Uuid>), ValidationError> {
        let client = NewClient {
            name: self.name,
            industry: self.industry,
            website: self.website,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            address: self.address,
            start_date: self.start_date,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
        };
        check(&client.name, &client.industry, &client.contact_person, &client.email)?;
        Ok((client, self.service_ids.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub website: MaybeUndefined<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: MaybeUndefined<String>,
    pub address: MaybeUndefined<String>,
    pub start_date: Option<NaiveDate>,
    pub status: Option<ClientStatus>,
    pub notes: MaybeUndefined<String>,
}

impl UpdateClientInput {
    pub fn apply_to(self, client: &mut Client) {
        set(&mut client.name, self.name);
        set(&mut client.industry, self.industry);
        set_nullable(&mut client.website, self.website);
        set(&mut client.contact_person, self.contact_person);
        set(&mut client.email, self.email);
        set_nullable(&mut client.phone, self.phone);
        set_nullable(&mut client.address, self.address);
        set(&mut client.start_date, self.start_date);
        set(&mut client.status, self.status);
        set_nullable(&mut client.notes, self.notes);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "ClientFilterInput")]
pub struct ClientFilter {
    pub status: Option<Vec<ClientStatus>>,
    pub industry: Option<String>,
}

fn check(
    name: &str,
    industry: &str,
    contact_person: &str,
    email: &str,
) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::non_empty("industry", industry)?;
    validation::non_empty("contactPerson", contact_person)?;
    validation::email("email", email)
}
