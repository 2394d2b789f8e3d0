//! Client repository
//!
//! Client CRUD plus the client <-> service association, which is always
//! written inside a transaction.

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, qualified, Conditions};
use crate::models::{Client, ClientFilter, NewClient, Page};

pub(crate) const COLUMNS: &str = "id, name, industry, website, contact_person, email, phone, \
    address, start_date, status, notes, created_at, updated_at";

/// Client repository
pub struct ClientRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ClientRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Client>, DbError> {
        sqlx::query_as::<_, Client>(&format!("SELECT {COLUMNS} FROM clients WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("get client")
    }

    /// List clients by name.
    pub async fn list(&self, filter: &ClientFilter, page: Page) -> Result<Vec<Client>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<Client>()
            .fetch_all(self.pool)
            .await
            .context("list clients")
    }

    pub async fn create(&self, client: &NewClient) -> Result<Client, DbError> {
        let mut conn = self.pool.acquire().await.context("acquire connection")?;
        insert(&mut conn, client).await
    }

    /// Insert a client and link it to `service_ids` (atomic).
    #[tracing::instrument(skip(self, client), fields(name = %client.name))]
    pub async fn create_with_services(
        &self,
        client: &NewClient,
        service_ids: &[Uuid],
    ) -> Result<Client, DbError> {
        let mut tx = self.pool.begin().await.context("begin client insert")?;
        let created = insert(&mut tx, client).await?;
        link_services(&mut tx, created.id, service_ids).await?;
        tx.commit().await.context("commit client insert")?;
        Ok(created)
    }

    #[tracing::instrument(skip(self, client), fields(id = %client.id))]
    pub async fn update(&self, client: &Client) -> Result<Client, DbError> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients
            SET name = $2, industry = $3, website = $4, contact_person = $5, email = $6,
                phone = $7, address = $8, start_date = $9, status = $10, notes = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(client.id)
        .bind(&client.name)
        .bind(&client.industry)
        .bind(&client.website)
        .bind(&client.contact_person)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.start_date)
        .bind(client.status)
        .bind(&client.notes)
        .fetch_optional(self.pool)
        .await
        .context("update client")?
        .ok_or_else(|| DbError::not_found("client", client.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete client")?;
        Ok(result.rows_affected() > 0)
    }

    /// Link services to a client (atomic).
    ///
    /// Either every link is written or none is. Links that already exist are
    /// left alone.
    #[tracing::instrument(skip(self, service_ids), fields(count = service_ids.len()))]
    pub async fn assign_services(
        &self,
        client_id: Uuid,
        service_ids: &[Uuid],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.context("begin service assignment")?;
        link_services(&mut tx, client_id, service_ids).await?;
        tx.commit().await.context("commit service assignment")?;
        Ok(())
    }

    /// Clients subscribed to a service.
    pub async fn for_service(&self, service_id: Uuid) -> Result<Vec<Client>, DbError> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {cols}
            FROM clients c
            JOIN client_service cs ON cs.client_id = c.id
            WHERE cs.service_id = $1
            ORDER BY c.name, c.id
            "#,
            cols = qualified(COLUMNS, "c")
        ))
        .bind(service_id)
        .fetch_all(self.pool)
        .await
        .context("clients for service")
    }
}

async fn insert(conn: &mut PgConnection, client: &NewClient) -> Result<Client, DbError> {
    sqlx::query_as::<_, Client>(&format!(
        r#"
        INSERT INTO clients (name, industry, website, contact_person, email, phone,
                             address, start_date, status, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&client.name)
    .bind(&client.industry)
    .bind(&client.website)
    .bind(&client.contact_person)
    .bind(&client.email)
    .bind(&client.phone)
    .bind(&client.address)
    .bind(client.start_date)
    .bind(client.status)
    .bind(&client.notes)
    .fetch_one(conn)
    .await
    .context("create client")
}

async fn link_services(
    conn: &mut PgConnection,
    client_id: Uuid,
    service_ids: &[Uuid],
) -> Result<(), DbError> {
    for service_id in service_ids {
        sqlx::query(
            r#"
            INSERT INTO client_service (client_id, service_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(client_id)
        .bind(service_id)
        .execute(&mut *conn)
        .await
        .context("assign service to client")?;
    }
    Ok(())
}

fn list_query(filter: &ClientFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM clients"));
    let mut conds = Conditions::new();

    if let Some(statuses) = filter.status.as_ref().filter(|s| !s.is_empty()) {
        conds
            .next(&mut qb)
            .push("status = ANY(")
            .push_bind(statuses.clone())
            .push(")");
    }
    if let Some(industry) = &filter.industry {
        conds.next(&mut qb).push("industry = ").push_bind(industry.clone());
    }

    qb.push(" ORDER BY name, id");
    push_page(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::ServiceRepo;
    use crate::models::{ClientStatus, NewService, UpdateClientInput};
    use async_graphql::MaybeUndefined;
    use chrono::NaiveDate;

    #[test]
    fn list_orders_by_name() {
        let filter = ClientFilter {
            industry: Some("Retail".into()),
            ..Default::default()
        };
        let qb = list_query(&filter, Page::all());
        assert!(qb.sql().ends_with(" WHERE industry = $1 ORDER BY name, id"));
    }

    fn acme() -> NewClient {
        NewClient {
            name: "Acme".into(),
            industry: "Manufacturing".into(),
            website: None,
            contact_person: "Wile E.".into(),
            email: "wile@acme.com".into(),
            phone: None,
            address: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: ClientStatus::Active,
            notes: None,
        }
    }

    fn outbound() -> NewService {
        NewService {
            name: "Outbound SDR".into(),
            description: None,
            price: 4500.0,
            features: vec!["sequencing".into()],
        }
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn assign_services_links_all(pool: PgPool) {
        let clients = ClientRepo::new(&pool);
        let services = ServiceRepo::new(&pool);
        let client = clients.create(&acme()).await.unwrap();
        let s1 = services.create(&outbound()).await.unwrap();
        let s2 = services.create(&outbound()).await.unwrap();

        clients.assign_services(client.id, &[s1.id, s2.id]).await.unwrap();
        // re-assigning is harmless
        clients.assign_services(client.id, &[s1.id]).await.unwrap();

        let linked = services.for_client(client.id).await.unwrap();
        assert_eq!(linked.len(), 2);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn failed_link_rolls_back_whole_assignment(pool: PgPool) {
        let clients = ClientRepo::new(&pool);
        let services = ServiceRepo::new(&pool);
        let client = clients.create(&acme()).await.unwrap();
        let s1 = services.create(&outbound()).await.unwrap();
        let missing = Uuid::new_v4();

        let result = clients.assign_services(client.id, &[s1.id, missing]).await;
        assert!(matches!(result, Err(DbError::Query { .. })));
        assert!(services.for_client(client.id).await.unwrap().is_empty());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn create_with_unknown_service_persists_nothing(pool: PgPool) {
        let clients = ClientRepo::new(&pool);
        let result = clients
            .create_with_services(&acme(), &[Uuid::new_v4()])
            .await;
        assert!(result.is_err());
        assert!(clients
            .list(&ClientFilter::default(), Page::all())
            .await
            .unwrap()
            .is_empty());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn clients_for_service_join(pool: PgPool) {
        let clients = ClientRepo::new(&pool);
        let services = ServiceRepo::new(&pool);
        let service = services.create(&outbound()).await.unwrap();
        let client = clients
            .create_with_services(&acme(), &[service.id])
            .await
            .unwrap();

        let subscribed = clients.for_service(service.id).await.unwrap();
        assert_eq!(subscribed, vec![client]);
        assert!(clients.for_service(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[test]
    fn empty_status_set_is_ignored() {
        let filter = ClientFilter {
            status: Some(vec![]),
            ..Default::default()
        };
        let qb = list_query(&filter, Page::all());
        assert!(!qb.sql().contains("WHERE"));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn partial_update_then_delete(pool: PgPool) {
        let repo = ClientRepo::new(&pool);
        let created = repo
            .create(&NewClient {
                website: Some("https://acme.com".into()),
                ..acme()
            })
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        let mut client = created.clone();
        UpdateClientInput {
            status: Some(ClientStatus::Paused),
            website: MaybeUndefined::Null,
            ..Default::default()
        }
        .apply_to(&mut client);
        repo.update(&client).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ClientStatus::Paused);
        assert_eq!(fetched.website, None);
        assert_eq!(fetched.name, created.name);
        assert_eq!(fetched.contact_person, created.contact_person);
        assert_eq!(fetched.email, created.email);
        assert_eq!(fetched.start_date, created.start_date);
        assert!(fetched.updated_at.is_some());

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
    }
}
