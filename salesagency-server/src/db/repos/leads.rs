//! Lead repository
//!
//! Handles lead CRUD plus:
//! - Dynamic filtered listing (status set, score floor, tag overlap, contact window)
//! - Atomic lead -> agent assignment

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, qualified, Conditions};
use crate::models::{Lead, LeadFilter, NewLead, Page};

pub(crate) const COLUMNS: &str = "id, name, email, phone, company, position, status, \
    intent_score, tags, source, last_contact, next_follow_up, notes, created_at, updated_at";

/// Lead repository
pub struct LeadRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a single lead by ID. `None` when no row matches.
    pub async fn get(&self, id: Uuid) -> Result<Option<Lead>, DbError> {
        sqlx::query_as::<_, Lead>(&format!("SELECT {COLUMNS} FROM leads WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("get lead")
    }

    /// List leads matching every present filter field, newest first.
    pub async fn list(&self, filter: &LeadFilter, page: Page) -> Result<Vec<Lead>, DbError> {
        let mut qb = list_query(filter, page);
        tracing::debug!(sql = qb.sql(), "listing leads");
        qb.build_query_as::<Lead>()
            .fetch_all(self.pool)
            .await
            .context("list leads")
    }

    #[tracing::instrument(skip(self, lead), fields(email = %lead.email))]
    pub async fn create(&self, lead: &NewLead) -> Result<Lead, DbError> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (name, email, phone, company, position, status, intent_score,
                               tags, source, last_contact, next_follow_up, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.position)
        .bind(lead.status)
        .bind(lead.intent_score)
        .bind(&lead.tags)
        .bind(&lead.source)
        .bind(lead.last_contact)
        .bind(lead.next_follow_up)
        .bind(&lead.notes)
        .fetch_one(self.pool)
        .await
        .context("create lead")
    }

    /// Rewrite every mutable column from `lead`.
    #[tracing::instrument(skip(self, lead), fields(id = %lead.id))]
    pub async fn update(&self, lead: &Lead) -> Result<Lead, DbError> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET name = $2, email = $3, phone = $4, company = $5, position = $6,
                status = $7, intent_score = $8, tags = $9, source = $10,
                last_contact = $11, next_follow_up = $12, notes = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(lead.id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.position)
        .bind(lead.status)
        .bind(lead.intent_score)
        .bind(&lead.tags)
        .bind(&lead.source)
        .bind(lead.last_contact)
        .bind(lead.next_follow_up)
        .bind(&lead.notes)
        .fetch_optional(self.pool)
        .await
        .context("update lead")?
        .ok_or_else(|| DbError::not_found("lead", lead.id))
    }

    /// Returns whether a row was removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete lead")?;
        Ok(result.rows_affected() > 0)
    }

    /// Leads assigned to an agent, most recently assigned first.
    pub async fn for_agent(&self, agent_id: Uuid) -> Result<Vec<Lead>, DbError> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {cols}
            FROM leads l
            JOIN lead_ai_agent la ON la.lead_id = l.id
            WHERE la.ai_agent_id = $1
            ORDER BY la.assigned_at DESC, l.id
            "#,
            cols = qualified(COLUMNS, "l")
        ))
        .bind(agent_id)
        .fetch_all(self.pool)
        .await
        .context("leads for agent")
    }

    /// Link a lead to an agent (atomic), then re-read the lead.
    ///
    /// Assigning an already linked pair is a no-op. Unknown ids fail on the
    /// foreign keys and nothing is written.
    #[tracing::instrument(skip(self))]
    pub async fn assign_to_agent(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Lead>, DbError> {
        let mut tx = self.pool.begin().await.context("begin assignment")?;

        sqlx::query(
            r#"
            INSERT INTO lead_ai_agent (lead_id, ai_agent_id, assigned_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(lead_id)
        .bind(agent_id)
        .execute(&mut *tx)
        .await
        .context("assign lead to agent")?;

        tx.commit().await.context("commit assignment")?;
        self.get(lead_id).await
    }
}

fn list_query(filter: &LeadFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM leads"));
    let mut conds = Conditions::new();

    if let Some(statuses) = filter.status.as_ref().filter(|s| !s.is_empty()) {
        conds
            .next(&mut qb)
            .push("status = ANY(")
            .push_bind(statuses.clone())
            .push(")");
    }
    if let Some(min) = filter.min_intent_score {
        conds.next(&mut qb).push("intent_score >= ").push_bind(min);
    }
    if let Some(tags) = filter.tags.as_ref().filter(|t| !t.is_empty()) {
        conds.next(&mut qb).push("tags && ").push_bind(tags.clone());
    }
    if let Some(source) = &filter.source {
        conds.next(&mut qb).push("source = ").push_bind(source.clone());
    }
    if let Some(after) = filter.last_contact_after {
        conds.next(&mut qb).push("last_contact >= ").push_bind(after);
    }
    if let Some(before) = filter.last_contact_before {
        conds.next(&mut qb).push("last_contact <= ").push_bind(before);
    }

    qb.push(" ORDER BY created_at DESC, id");
    push_page(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateLeadInput, LeadStatus, UpdateLeadInput};
    use async_graphql::MaybeUndefined;

    #[test]
    fn empty_filter_has_no_where() {
        let qb = list_query(&LeadFilter::default(), Page::all());
        assert_eq!(
            qb.sql(),
            format!("SELECT {COLUMNS} FROM leads ORDER BY created_at DESC, id")
        );
    }

    #[test]
    fn filter_fields_are_conjunctive() {
        let filter = LeadFilter {
            status: Some(vec![LeadStatus::New, LeadStatus::Qualified]),
            min_intent_score: Some(0.8),
            tags: Some(vec!["saas".into()]),
            ..Default::default()
        };
        let qb = list_query(&filter, Page { limit: Some(10), offset: None });
        let sql = qb.sql();
        assert!(sql.contains(
            " WHERE status = ANY($1) AND intent_score >= $2 AND tags && $3 ORDER BY"
        ));
        assert!(sql.ends_with("LIMIT $4"));
    }

    #[test]
    fn empty_sets_add_no_predicate() {
        let filter = LeadFilter {
            status: Some(vec![]),
            tags: Some(vec![]),
            ..Default::default()
        };
        let qb = list_query(&filter, Page::all());
        assert!(!qb.sql().contains("WHERE"));
    }

    #[test]
    fn contact_window_bounds() {
        let filter = LeadFilter {
            last_contact_after: Some(chrono::Utc::now()),
            last_contact_before: Some(chrono::Utc::now()),
            ..Default::default()
        };
        let qb = list_query(&filter, Page::all());
        assert!(qb
            .sql()
            .contains("WHERE last_contact >= $1 AND last_contact <= $2"));
    }

    #[test]
    fn qualified_lead_columns() {
        let cols = qualified(COLUMNS, "l");
        assert!(cols.starts_with("l.id, l.name, "));
        assert!(cols.ends_with("l.updated_at"));
    }

    fn jane() -> NewLead {
        CreateLeadInput {
            name: "Jane Doe".into(),
            email: "jane@acme.com".into(),
            ..Default::default()
        }
        .into_new()
        .unwrap()
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn create_then_get_round_trips(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        let new = NewLead {
            tags: vec!["b".into(), "a".into(), "b".into()],
            phone: Some(String::new()),
            ..jane()
        };
        let created = repo.create(&new).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.status, LeadStatus::New);
        assert_eq!(fetched.intent_score, 0.5);
        assert_eq!(fetched.tags, vec!["b", "a", "b"]);
        // empty string is not NULL
        assert_eq!(fetched.phone.as_deref(), Some(""));
        assert_eq!(fetched.company, None);
        assert_eq!(fetched.updated_at, None);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn get_missing_is_none(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn delete_is_idempotent(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        let lead = repo.create(&jane()).await.unwrap();
        assert!(repo.delete(lead.id).await.unwrap());
        assert!(!repo.delete(lead.id).await.unwrap());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn partial_update_preserves_absent_fields(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        let created = repo
            .create(&NewLead {
                status: LeadStatus::Qualified,
                intent_score: 0.9,
                tags: vec!["saas".into()],
                ..jane()
            })
            .await
            .unwrap();

        let mut lead = repo.get(created.id).await.unwrap().unwrap();
        UpdateLeadInput {
            notes: MaybeUndefined::Value("call back".into()),
            ..Default::default()
        }
        .apply_to(&mut lead);
        let updated = repo.update(&lead).await.unwrap();

        assert_eq!(updated.notes.as_deref(), Some("call back"));
        assert_eq!(updated.status, LeadStatus::Qualified);
        assert_eq!(updated.tags, vec!["saas"]);
        assert_eq!(updated.intent_score, 0.9);
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, created.created_at);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn update_missing_is_not_found(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        let mut lead = repo.create(&jane()).await.unwrap();
        repo.delete(lead.id).await.unwrap();
        lead.notes = Some("ghost".into());
        assert!(matches!(
            repo.update(&lead).await,
            Err(DbError::NotFound { resource: "lead", .. })
        ));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn min_intent_score_filter(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        for score in [0.2, 0.8, 0.95] {
            repo.create(&NewLead {
                intent_score: score,
                ..jane()
            })
            .await
            .unwrap();
        }

        let all = repo.list(&LeadFilter::default(), Page::all()).await.unwrap();
        assert_eq!(all.len(), 3);

        let hot = repo
            .list(
                &LeadFilter {
                    min_intent_score: Some(0.8),
                    ..Default::default()
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(hot.len(), 2);
        assert!(hot.iter().all(|l| l.intent_score >= 0.8));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn status_set_and_tag_overlap(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        repo.create(&NewLead {
            status: LeadStatus::Won,
            tags: vec!["saas".into()],
            ..jane()
        })
        .await
        .unwrap();
        repo.create(&NewLead {
            status: LeadStatus::Lost,
            tags: vec!["retail".into()],
            ..jane()
        })
        .await
        .unwrap();
        repo.create(&jane()).await.unwrap();

        let closed = repo
            .list(
                &LeadFilter {
                    status: Some(vec![LeadStatus::Won, LeadStatus::Lost]),
                    ..Default::default()
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(closed.len(), 2);

        let saas = repo
            .list(
                &LeadFilter {
                    tags: Some(vec!["saas".into(), "fintech".into()]),
                    ..Default::default()
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(saas.len(), 1);
        assert_eq!(saas[0].status, LeadStatus::Won);

        let unconstrained = repo
            .list(
                &LeadFilter {
                    status: Some(vec![]),
                    tags: Some(vec![]),
                    ..Default::default()
                },
                Page::all(),
            )
            .await
            .unwrap();
        assert_eq!(unconstrained.len(), 3);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn pagination_windows_newest_first(pool: PgPool) {
        let repo = LeadRepo::new(&pool);
        let mut ids = Vec::new();
        for i in 0..5 {
            let lead = repo
                .create(&NewLead {
                    name: format!("Lead {i}"),
                    ..jane()
                })
                .await
                .unwrap();
            ids.push(lead.id);
            // distinct created_at values
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let page = repo
            .list(&LeadFilter::default(), Page { limit: Some(2), offset: Some(2) })
            .await
            .unwrap();
        // newest first: ids[4], ids[3], ids[2], ids[1], ids[0]
        assert_eq!(page.iter().map(|l| l.id).collect::<Vec<_>>(), vec![ids[2], ids[1]]);
    }
}
