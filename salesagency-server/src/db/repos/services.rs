//! Service catalogue repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, qualified, Conditions};
use crate::models::{NewService, Page, Service, ServiceFilter};

pub(crate) const COLUMNS: &str = "id, name, description, price, features, created_at, updated_at";

/// Service catalogue repository
pub struct ServiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ServiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Service>, DbError> {
        sqlx::query_as::<_, Service>(&format!("SELECT {COLUMNS} FROM services WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("get service")
    }

    pub async fn list(&self, filter: &ServiceFilter, page: Page) -> Result<Vec<Service>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<Service>()
            .fetch_all(self.pool)
            .await
            .context("list services")
    }

    #[tracing::instrument(skip(self, service), fields(name = %service.name))]
    pub async fn create(&self, service: &NewService) -> Result<Service, DbError> {
        sqlx::query_as::<_, Service>(&format!(
            r#"
            INSERT INTO services (name, description, price, features)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(&service.features)
        .fetch_one(self.pool)
        .await
        .context("create service")
    }

    #[tracing::instrument(skip(self, service), fields(id = %service.id))]
    pub async fn update(&self, service: &Service) -> Result<Service, DbError> {
        sqlx::query_as::<_, Service>(&format!(
            r#"
            UPDATE services
            SET name = $2, description = $3, price = $4, features = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(&service.features)
        .fetch_optional(self.pool)
        .await
        .context("update service")?
        .ok_or_else(|| DbError::not_found("service", service.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete service")?;
        Ok(result.rows_affected() > 0)
    }

    /// Services a client is subscribed to.
    pub async fn for_client(&self, client_id: Uuid) -> Result<Vec<Service>, DbError> {
        sqlx::query_as::<_, Service>(&format!(
            r#"
            SELECT {cols}
            FROM services s
            JOIN client_service cs ON cs.service_id = s.id
            WHERE cs.client_id = $1
            ORDER BY s.name, s.id
            "#,
            cols = qualified(COLUMNS, "s")
        ))
        .bind(client_id)
        .fetch_all(self.pool)
        .await
        .context("services for client")
    }
}

fn list_query(filter: &ServiceFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM services"));
    let mut conds = Conditions::new();

    if let Some(name) = &filter.name {
        conds.next(&mut qb).push("name = ").push_bind(name.clone());
    }
    if let Some(min) = filter.min_price {
        conds.next(&mut qb).push("price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        conds.next(&mut qb).push("price <= ").push_bind(max);
    }

    qb.push(" ORDER BY name, id");
    push_page(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateServiceInput;

    #[test]
    fn price_band() {
        let filter = ServiceFilter {
            min_price: Some(100.0),
            max_price: Some(500.0),
            ..Default::default()
        };
        let qb = list_query(&filter, Page { limit: None, offset: Some(10) });
        assert!(qb
            .sql()
            .ends_with(" WHERE price >= $1 AND price <= $2 ORDER BY name, id OFFSET $3"));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn features_round_trip_in_order(pool: PgPool) {
        let repo = ServiceRepo::new(&pool);
        let created = repo
            .create(&NewService {
                name: "Audit".into(),
                description: None,
                price: 0.0,
                features: vec!["z".into(), "a".into(), "z".into()],
            })
            .await
            .unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.features, vec!["z", "a", "z"]);
        assert!(repo.for_client(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn partial_update_then_delete(pool: PgPool) {
        let repo = ServiceRepo::new(&pool);
        let created = repo
            .create(&NewService {
                name: "Inbound desk".into(),
                description: Some("24/7 reply coverage".into()),
                price: 1200.0,
                features: vec!["chat".into(), "email".into()],
            })
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        let mut service = created.clone();
        UpdateServiceInput {
            price: Some(1500.0),
            ..Default::default()
        }
        .apply_to(&mut service);
        repo.update(&service).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.price, 1500.0);
        assert_eq!(fetched.name, "Inbound desk");
        assert_eq!(fetched.description.as_deref(), Some("24/7 reply coverage"));
        assert_eq!(fetched.features, vec!["chat", "email"]);

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
