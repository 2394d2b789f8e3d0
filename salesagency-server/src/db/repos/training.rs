//! Training program and module repositories

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, Conditions};
use crate::models::{
    NewTrainingModule, NewTrainingProgram, Page, TrainingModule, TrainingModuleFilter,
    TrainingProgram, TrainingProgramFilter,
};

const PROGRAM_COLUMNS: &str = "id, name, description, status, created_at, updated_at";

const MODULE_COLUMNS: &str =
    "id, program_id, title, content, position, duration_minutes, created_at, updated_at";

pub struct ProgramRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProgramRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<TrainingProgram>, DbError> {
        sqlx::query_as::<_, TrainingProgram>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM training_programs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get training program")
    }

    pub async fn list(
        &self,
        filter: &TrainingProgramFilter,
        page: Page,
    ) -> Result<Vec<TrainingProgram>, DbError> {
        let mut qb = program_list_query(filter, page);
        qb.build_query_as::<TrainingProgram>()
            .fetch_all(self.pool)
            .await
            .context("list training programs")
    }

    #[tracing::instrument(skip(self, program), fields(name = %program.name))]
    pub async fn create(&self, program: &NewTrainingProgram) -> Result<TrainingProgram, DbError> {
        sqlx::query_as::<_, TrainingProgram>(&format!(
            r#"
            INSERT INTO training_programs (name, description, status)
            VALUES ($1, $2, $3)
            RETURNING {PROGRAM_COLUMNS}
            "#
        ))
        .bind(&program.name)
        .bind(&program.description)
        .bind(program.status)
        .fetch_one(self.pool)
        .await
        .context("create training program")
    }

    #[tracing::instrument(skip(self, program), fields(id = %program.id))]
    pub async fn update(&self, program: &TrainingProgram) -> Result<TrainingProgram, DbError> {
        sqlx::query_as::<_, TrainingProgram>(&format!(
            r#"
            UPDATE training_programs
            SET name = $2, description = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROGRAM_COLUMNS}
            "#
        ))
        .bind(program.id)
        .bind(&program.name)
        .bind(&program.description)
        .bind(program.status)
        .fetch_optional(self.pool)
        .await
        .context("update training program")?
        .ok_or_else(|| DbError::not_found("training program", program.id))
    }

    /// Deleting a program removes its modules too.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM training_programs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete training program")?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct ModuleRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ModuleRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<TrainingModule>, DbError> {
        sqlx::query_as::<_, TrainingModule>(&format!(
            "SELECT {MODULE_COLUMNS} FROM training_modules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get training module")
    }

    pub async fn list(
        &self,
        filter: &TrainingModuleFilter,
        page: Page,
    ) -> Result<Vec<TrainingModule>, DbError> {
        let mut qb = module_list_query(filter, page);
        qb.build_query_as::<TrainingModule>()
            .fetch_all(self.pool)
            .await
            .context("list training modules")
    }

    #[tracing::instrument(skip(self, module), fields(program_id = %module.program_id))]
    pub async fn create(&self, module: &NewTrainingModule) -> Result<TrainingModule, DbError> {
        sqlx::query_as::<_, TrainingModule>(&format!(
            r#"
            INSERT INTO training_modules (program_id, title, content, position, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MODULE_COLUMNS}
            "#
        ))
        .bind(module.program_id)
        .bind(&module.title)
        .bind(&module.content)
        .bind(module.position)
        .bind(module.duration_minutes)
        .fetch_one(self.pool)
        .await
        .context("create training module")
    }

    #[tracing::instrument(skip(self, module), fields(id = %module.id))]
    pub async fn update(&self, module: &TrainingModule) -> Result<TrainingModule, DbError> {
        sqlx::query_as::<_, TrainingModule>(&format!(
            r#"
            UPDATE training_modules
            SET program_id = $2, title = $3, content = $4, position = $5,
                duration_minutes = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {MODULE_COLUMNS}
            "#
        ))
        .bind(module.id)
        .bind(module.program_id)
        .bind(&module.title)
        .bind(&module.content)
        .bind(module.position)
        .bind(module.duration_minutes)
        .fetch_optional(self.pool)
        .await
        .context("update training module")?
        .ok_or_else(|| DbError::not_found("training module", module.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM training_modules WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete training module")?;
        Ok(result.rows_affected() > 0)
    }

    /// Modules of a program in `position` order.
    pub async fn for_program(&self, program_id: Uuid) -> Result<Vec<TrainingModule>, DbError> {
        let filter = TrainingModuleFilter {
            program_id: Some(program_id),
        };
        self.list(&filter, Page::all()).await
    }
}

fn program_list_query(
    filter: &TrainingProgramFilter,
    page: Page,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {PROGRAM_COLUMNS} FROM training_programs"));
    let mut conds = Conditions::new();

    if let Some(status) = filter.status {
        conds.next(&mut qb).push("status = ").push_bind(status);
    }

    qb.push(" ORDER BY name, id");
    push_page(&mut qb, page);
    qb
}

fn module_list_query(
    filter: &TrainingModuleFilter,
    page: Page,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {MODULE_COLUMNS} FROM training_modules"));
    let mut conds = Conditions::new();

    if let Some(program_id) = filter.program_id {
        conds.next(&mut qb).push("program_id = ").push_bind(program_id);
    }

    qb.push(" ORDER BY position, id");
    push_page(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrainingStatus, UpdateTrainingModuleInput, UpdateTrainingProgramInput};
    use async_graphql::MaybeUndefined;

    #[test]
    fn modules_ordered_by_position() {
        let qb = module_list_query(&TrainingModuleFilter::default(), Page::all());
        assert!(qb.sql().ends_with("FROM training_modules ORDER BY position, id"));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn program_modules_in_position_order(pool: PgPool) {
        let program = ProgramRepo::new(&pool)
            .create(&NewTrainingProgram {
                name: "Onboarding".into(),
                description: None,
                status: TrainingStatus::Published,
            })
            .await
            .unwrap();
        let modules = ModuleRepo::new(&pool);
        for (position, title) in [(2, "Closing"), (0, "Intro"), (1, "Discovery")] {
            modules
                .create(&NewTrainingModule {
                    program_id: program.id,
                    title: title.into(),
                    content: None,
                    position,
                    duration_minutes: Some(30),
                })
                .await
                .unwrap();
        }

        let titles: Vec<_> = modules
            .for_program(program.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Intro", "Discovery", "Closing"]);

        assert!(ProgramRepo::new(&pool).delete(program.id).await.unwrap());
        assert!(modules.for_program(program.id).await.unwrap().is_empty());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn program_partial_update_then_delete(pool: PgPool) {
        let repo = ProgramRepo::new(&pool);
        let created = repo
            .create(&NewTrainingProgram {
                name: "Objection handling".into(),
                description: Some("price and timing".into()),
                status: TrainingStatus::Draft,
            })
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        let mut program = created.clone();
        UpdateTrainingProgramInput {
            status: Some(TrainingStatus::Published),
            ..Default::default()
        }
        .apply_to(&mut program);
        repo.update(&program).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TrainingStatus::Published);
        assert_eq!(fetched.name, "Objection handling");
        assert_eq!(fetched.description.as_deref(), Some("price and timing"));

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn module_partial_update_then_delete(pool: PgPool) {
        let program = ProgramRepo::new(&pool)
            .create(&NewTrainingProgram {
                name: "Discovery".into(),
                description: None,
                status: TrainingStatus::Draft,
            })
            .await
            .unwrap();
        let repo = ModuleRepo::new(&pool);
        let created = repo
            .create(&NewTrainingModule {
                program_id: program.id,
                title: "Open questions".into(),
                content: Some("who, what, why".into()),
                position: 3,
                duration_minutes: Some(20),
            })
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        let mut module = created.clone();
        UpdateTrainingModuleInput {
            title: Some("Open-ended questions".into()),
            duration_minutes: MaybeUndefined::Null,
            ..Default::default()
        }
        .apply_to(&mut module);
        repo.update(&module).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Open-ended questions");
        assert_eq!(fetched.duration_minutes, None);
        assert_eq!(fetched.content.as_deref(), Some("who, what, why"));
        assert_eq!(fetched.position, 3);
        assert_eq!(fetched.program_id, program.id);

        let listed = repo
            .list(
                &TrainingModuleFilter {
                    program_id: Some(program.id),
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(listed, vec![fetched]);

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
