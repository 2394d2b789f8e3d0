use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::UserRole;
use super::patch::set;
use super::validation::{self, ValidationError};

/// Agency staff account. Email is unique across users.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.name, &self.email)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    /// Defaults to `SALES_REP`
    pub role: Option<UserRole>,
    /// Defaults to true
    pub active: Option<bool>,
}

impl CreateUserInput {
    pub fn into_new(self) -> Result<NewUser, ValidationError> {
        check(&self.name, &self.email)?;
        Ok(NewUser {
            name: self.name,
            email: self.email,
            role: self.role.unwrap_or_default(),
            active: self.active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

impl UpdateUserInput {
    pub fn apply_to(self, user: &mut User) {
        set(&mut user.name, self.name);
        set(&mut user.email, self.email);
        set(&mut user.role, self.role);
        set(&mut user.active, self.active);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "UserFilterInput")]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
    pub email: Option<String>,
}

fn check(name: &str, email: &str) -> Result<(), ValidationError> {
    validation::non_empty("name", name)?;
    validation::email("email", email)
}
