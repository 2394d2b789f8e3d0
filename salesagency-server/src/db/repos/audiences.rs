//! Target audience repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DbError, QueryContext};
use crate::db::query::{push_page, Conditions};
use crate::models::{NewTargetAudience, Page, TargetAudience, TargetAudienceFilter};

pub(crate) const COLUMNS: &str = "id, name, industry, company_size, location, \
    decision_maker_role, pain_points, campaign_id, created_at, updated_at";

/// Target audience repository
pub struct AudienceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AudienceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<TargetAudience>, DbError> {
        sqlx::query_as::<_, TargetAudience>(&format!(
            "SELECT {COLUMNS} FROM target_audiences WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("get target audience")
    }

    pub async fn list(
        &self,
        filter: &TargetAudienceFilter,
        page: Page,
    ) -> Result<Vec<TargetAudience>, DbError> {
        let mut qb = list_query(filter, page);
        qb.build_query_as::<TargetAudience>()
            .fetch_all(self.pool)
            .await
            .context("list target audiences")
    }

    #[tracing::instrument(skip(self, audience), fields(campaign_id = %audience.campaign_id))]
    pub async fn create(&self, audience: &NewTargetAudience) -> Result<TargetAudience, DbError> {
        sqlx::query_as::<_, TargetAudience>(&format!(
            r#"
            INSERT INTO target_audiences (name, industry, company_size, location,
                                          decision_maker_role, pain_points, campaign_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&audience.name)
        .bind(&audience.industry)
        .bind(&audience.company_size)
        .bind(&audience.location)
        .bind(&audience.decision_maker_role)
        .bind(&audience.pain_points)
        .bind(audience.campaign_id)
        .fetch_one(self.pool)
        .await
        .context("create target audience")
    }

    #[tracing::instrument(skip(self, audience), fields(id = %audience.id))]
    pub async fn update(&self, audience: &TargetAudience) -> Result<TargetAudience, DbError> {
        sqlx::query_as::<_, TargetAudience>(&format!(
            r#"
            UPDATE target_audiences
            SET name = $2, industry = $3, company_size = $4, location = $5,
                decision_maker_role = $6, pain_points = $7, campaign_id = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(audience.id)
        .bind(&audience.name)
        .bind(&audience.industry)
        .bind(&audience.company_size)
        .bind(&audience.location)
        .bind(&audience.decision_maker_role)
        .bind(&audience.pain_points)
        .bind(audience.campaign_id)
        .fetch_optional(self.pool)
        .await
        .context("update target audience")?
        .ok_or_else(|| DbError::not_found("target audience", audience.id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM target_audiences WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .context("delete target audience")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn for_campaign(&self, campaign_id: Uuid) -> Result<Vec<TargetAudience>, DbError> {
        let filter = TargetAudienceFilter {
            campaign_id: Some(campaign_id),
            industry: None,
        };
        self.list(&filter, Page::all()).await
    }
}

fn list_query(filter: &TargetAudienceFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM target_audiences"));
    let mut conds = Conditions::new();

    if let Some(campaign_id) = filter.campaign_id {
        conds.next(&mut qb).push("campaign_id = ").push_bind(campaign_id);
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
    use crate::db::repos::CampaignRepo;
    use crate::models::{CampaignStatus, NewCampaign, UpdateTargetAudienceInput};
    use async_graphql::MaybeUndefined;
    use chrono::NaiveDate;

    #[test]
    fn industry_filter() {
        let filter = TargetAudienceFilter {
            campaign_id: None,
            industry: Some("Finance".into()),
        };
        assert!(list_query(&filter, Page::all())
            .sql()
            .ends_with(" WHERE industry = $1 ORDER BY name, id"));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn audiences_follow_their_campaign(pool: PgPool) {
        let campaigns = CampaignRepo::new(&pool);
        let campaign = campaigns
            .create(&NewCampaign {
                name: "Q3 push".into(),
                description: None,
                client_id: None,
                start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                end_date: None,
                status: CampaignStatus::Scheduled,
                budget: None,
            })
            .await
            .unwrap();
        let repo = AudienceRepo::new(&pool);
        let audience = repo
            .create(&NewTargetAudience {
                name: "CFOs".into(),
                industry: "Finance".into(),
                company_size: None,
                location: Some("EMEA".into()),
                decision_maker_role: None,
                pain_points: vec!["close speed".into()],
                campaign_id: campaign.id,
            })
            .await
            .unwrap();

        assert_eq!(repo.for_campaign(campaign.id).await.unwrap(), vec![audience.clone()]);

        campaigns.delete(campaign.id).await.unwrap();
        assert!(repo.get(audience.id).await.unwrap().is_none());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    #[ignore = "requires database"]
    async fn partial_update_then_delete(pool: PgPool) {
        let campaign = CampaignRepo::new(&pool)
            .create(&NewCampaign {
                name: "Q4 push".into(),
                description: None,
                client_id: None,
                start_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
                end_date: None,
                status: CampaignStatus::Draft,
                budget: None,
            })
            .await
            .unwrap();
        let repo = AudienceRepo::new(&pool);
        let created = repo
            .create(&NewTargetAudience {
                name: "Ops leads".into(),
                industry: "Logistics".into(),
                company_size: Some("50-200".into()),
                location: Some("US".into()),
                decision_maker_role: Some("VP Ops".into()),
                pain_points: vec!["routing".into(), "visibility".into()],
                campaign_id: campaign.id,
            })
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        let mut audience = created.clone();
        UpdateTargetAudienceInput {
            location: MaybeUndefined::Value("North America".into()),
            company_size: MaybeUndefined::Null,
            ..Default::default()
        }
        .apply_to(&mut audience);
        repo.update(&audience).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.location.as_deref(), Some("North America"));
        assert_eq!(fetched.company_size, None);
        assert_eq!(fetched.name, "Ops leads");
        assert_eq!(fetched.industry, "Logistics");
        assert_eq!(fetched.decision_maker_role.as_deref(), Some("VP Ops"));
        assert_eq!(fetched.pain_points, vec!["routing", "visibility"]);
        assert_eq!(fetched.campaign_id, campaign.id);

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
