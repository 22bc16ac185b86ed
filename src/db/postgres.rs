use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};

use crate::{
    db::redis::SearchHistory,
    error::AppResult,
    models::{
        Employer, EmployerId, FeedbackSets, JobPosting, RankedEmployer, Recommendation,
        RecommendationKey,
    },
    services::providers::{CatalogSource, FeedbackSource, RecommendationStore},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// One company/posting/tech-stack combination from the catalog join
#[derive(Debug, FromRow)]
struct CatalogRow {
    company_id: i64,
    company_name: String,
    logo: Option<String>,
    job_notice_id: Option<i64>,
    deadline: Option<DateTime<Utc>>,
    tech_stack_name: Option<String>,
}

const CATALOG_QUERY: &str = r#"
    SELECT c.company_id::BIGINT AS company_id,
           c.company_name,
           c.logo,
           jn.job_notice_id::BIGINT AS job_notice_id,
           jn.deadline_dttm::TIMESTAMPTZ AS deadline,
           ts.tech_stack_name
    FROM company c
    LEFT JOIN job_notice jn ON jn.company_id = c.company_id
    LEFT JOIN notice_tech_stack nts ON nts.job_notice_id = jn.job_notice_id
    LEFT JOIN tech_stack ts ON ts.tech_stack_id = nts.tech_stack_id
    ORDER BY c.company_id, jn.job_notice_id, ts.tech_stack_id
"#;

/// Folds the ordered join rows back into employers with their postings
fn group_catalog_rows(rows: Vec<CatalogRow>) -> Vec<Employer> {
    let mut employers: Vec<Employer> = Vec::new();

    for row in rows {
        if employers.last().map(|e| e.id) != Some(row.company_id) {
            employers.push(Employer {
                id: row.company_id,
                name: row.company_name,
                logo: row.logo,
                postings: Vec::new(),
            });
        }
        let Some(employer) = employers.last_mut() else {
            continue;
        };

        let Some(job_notice_id) = row.job_notice_id else {
            continue;
        };
        if employer.postings.last().map(|p| p.id) != Some(job_notice_id) {
            employer.postings.push(JobPosting {
                id: job_notice_id,
                employer_id: employer.id,
                tech_stack: Vec::new(),
                deadline: row.deadline,
            });
        }
        if let (Some(posting), Some(tech)) = (employer.postings.last_mut(), row.tech_stack_name) {
            posting.tech_stack.push(tech);
        }
    }

    employers
}

/// Employer catalog read from the relational job tables
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogSource for PgCatalog {
    async fn load_employers(&self) -> AppResult<Vec<Employer>> {
        let rows: Vec<CatalogRow> = sqlx::query_as(CATALOG_QUERY).fetch_all(&self.pool).await?;
        let employers = group_catalog_rows(rows);
        tracing::debug!(employers = employers.len(), "Loaded employer catalog");
        Ok(employers)
    }
}

/// Likes, blacklist and scraps from Postgres; search history from Redis
pub struct PgFeedback {
    pool: PgPool,
    search_history: SearchHistory,
}

impl PgFeedback {
    pub fn new(pool: PgPool, search_history: SearchHistory) -> Self {
        Self {
            pool,
            search_history,
        }
    }

    async fn company_ids(&self, table: FeedbackTable, user_id: i64) -> AppResult<BTreeSet<EmployerId>> {
        let query = format!(
            "SELECT company_id::BIGINT FROM {} WHERE user_id = $1",
            table.name()
        );
        let ids: Vec<i64> = sqlx::query_scalar(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy)]
enum FeedbackTable {
    Likes,
    Blacklist,
    Scraps,
}

impl FeedbackTable {
    fn name(self) -> &'static str {
        match self {
            FeedbackTable::Likes => "user_likes",
            FeedbackTable::Blacklist => "user_blacklist",
            FeedbackTable::Scraps => "user_scraps",
        }
    }
}

#[async_trait::async_trait]
impl FeedbackSource for PgFeedback {
    async fn load_feedback(&self, user_id: i64) -> AppResult<FeedbackSets> {
        let (liked, blacklisted, scraped, searched) = tokio::try_join!(
            self.company_ids(FeedbackTable::Likes, user_id),
            self.company_ids(FeedbackTable::Blacklist, user_id),
            self.company_ids(FeedbackTable::Scraps, user_id),
            self.search_history.employers(user_id),
        )?;

        Ok(FeedbackSets {
            liked,
            blacklisted,
            scraped,
            searched,
        })
    }

    async fn record_search_detail(&self, user_id: i64, employer_id: EmployerId) -> AppResult<()> {
        self.search_history.record(user_id, employer_id).await
    }
}

#[derive(Debug, FromRow)]
struct RecommendationRow {
    user_id: i64,
    selected_repositories_id: String,
    user_github_name: String,
    recommendations: Json<Vec<RankedEmployer>>,
    created_at: DateTime<Utc>,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Self {
            user_id: row.user_id,
            selected_repositories_id: row.selected_repositories_id,
            user_github_name: row.user_github_name,
            recommendations: row.recommendations.0,
            timestamp: row.created_at,
        }
    }
}

/// Recommendation results in the `recommend_result` table
pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn upsert(&self, record: &Recommendation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recommend_result
                (user_id, selected_repositories_id, user_github_name, recommendations, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, selected_repositories_id) DO UPDATE
            SET user_github_name = EXCLUDED.user_github_name,
                recommendations = EXCLUDED.recommendations,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(record.user_id)
        .bind(&record.selected_repositories_id)
        .bind(&record.user_github_name)
        .bind(Json(&record.recommendations))
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;

        tracing::debug!(key = %record.key(), "Upserted recommendation");
        Ok(())
    }

    async fn find(&self, key: &RecommendationKey) -> AppResult<Option<Recommendation>> {
        let row: Option<RecommendationRow> = sqlx::query_as(
            r#"
            SELECT user_id, selected_repositories_id, user_github_name, recommendations, created_at
            FROM recommend_result
            WHERE user_id = $1 AND selected_repositories_id = $2
            "#,
        )
        .bind(key.user_id)
        .bind(&key.selected_repositories_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Recommendation::from))
    }
}
