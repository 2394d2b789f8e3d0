//! Training programs and their ordered modules

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::TrainingStatus;
use super::patch::{set, set_nullable};
use super::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgram {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: TrainingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrainingProgram {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrainingProgram {
    pub name: String,
    pub description: Option<String>,
    pub status: TrainingStatus,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateTrainingProgramInput {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `DRAFT`
    pub status: Option<TrainingStatus>,
}

impl CreateTrainingProgramInput {
    pub fn into_new(self) -> Result<NewTrainingProgram, ValidationError> {
        validation::non_empty("name", &self.name)?;
        Ok(NewTrainingProgram {
            name: self.name,
            description: self.description,
            status: self.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateTrainingProgramInput {
    pub name: Option<String>,
    pub description: MaybeUndefined<String>,
    pub status: Option<TrainingStatus>,
}

impl UpdateTrainingProgramInput {
    pub fn apply_to(self, program: &mut TrainingProgram) {
        set(&mut program.name, self.name);
        set_nullable(&mut program.description, self.description);
        set(&mut program.status, self.status);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "TrainingProgramFilterInput")]
pub struct TrainingProgramFilter {
    pub status: Option<TrainingStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct TrainingModule {
    pub id: Uuid,
    pub program_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    /// Sort key within the program, ascending
    pub position: i32,
    pub duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrainingModule {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_module(&self.title, self.position, self.duration_minutes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrainingModule {
    pub program_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateTrainingModuleInput {
    pub program_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    /// Defaults to 0
    pub position: Option<i32>,
    pub duration_minutes: Option<i32>,
}

impl CreateTrainingModuleInput {
    pub fn into_new(self) -> Result<NewTrainingModule, ValidationError> {
        let module = NewTrainingModule {
            program_id: self.program_id,
            title: self.title,
            content: self.content,
            position: self.position.unwrap_or(0),
            duration_minutes: self.duration_minutes,
        };
        check_module(&module.title, module.position, module.duration_minutes)?;
        Ok(module)
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateTrainingModuleInput {
    pub program_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: MaybeUndefined<String>,
    pub position: Option<i32>,
    pub duration_minutes: MaybeUndefined<i32>,
}

impl UpdateTrainingModuleInput {
    pub fn apply_to(self, module: &mut TrainingModule) {
        set(&mut module.program_id, self.program_id);
        set(&mut module.title, self.title);
        set_nullable(&mut module.content, self.content);
        set(&mut module.position, self.position);
        set_nullable(&mut module.duration_minutes, self.duration_minutes);
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "TrainingModuleFilterInput")]
pub struct TrainingModuleFilter {
    pub program_id: Option<Uuid>,
}

fn check_module(
    title: &str,
    position: i32,
    duration_minutes: Option<i32>,
) -> Result<(), ValidationError> {
    validation::non_empty("title", title)?;
    validation::non_negative_int("position", position)?;
    if let Some(minutes) = duration_minutes {
        validation::non_negative_int("durationMinutes", minutes)?;
    }
    Ok(())
}
