//! User repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, Conditions};
use crate::models::{NewUser, Page, User, UserFilter};

pub(crate) const COLUMNS: &str = "id, name, email, role, active, created_at, updated_at";

/// User repository. Duplicate emails surface as a `DbError::Query` from the
/// unique index.
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>, DbError> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("get user")
    }

    pub async fn list(&self, filter: &UserFilter, page: Page) -> Result<Vec<User>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<User>()
            .fetch_all(self.pool)
            .await
            .context("list users")
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, role, active)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.active)
        .fetch_one(self.pool)
        .await
        .context("create user")
    }

    #[tracing::instrument(skip(self, user), fields(id = %user.id))]
    pub async fn update(&self, user: &User) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, active = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.active)
        .fetch_optional(self.pool)
        .await
        .context("update user")?
        .ok_or_else(|| DbError::not_found("user", user.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete user")?;
        Ok(result.rows_affected() > 0)
    }
}

fn list_query(filter: &UserFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM users"));
    let mut conds = Conditions::new();

    if let Some(role) = filter.role {
        conds.next(&mut qb).push("role = ").push_bind(role);
    }
    if let Some(active) = filter.active {
        conds.next(&mut qb).push("active = ").push_bind(active);
    }
    if let Some(email) = &filter.email {
        conds.next(&mut qb).push("email = ").push_bind(email.clone());
    }

    qb.push(" ORDER BY name, id");
    push_page(&mut qb, page);
    qb
}
