use crate::types::{error::Result, tables::Problem};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgRow, Postgres},
    Pool, QueryBuilder, Row,
};

const DEFAULT_PAGE: i64 = 1;
const MAX_PAGE_SIZE: i64 = 100;

/// Durable catalog storage. The batch upsert is the pipeline's unit of
/// atomicity: a batch is either fully visible or not at all.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn upsert_batch(&self, batch: &[Problem]) -> Result<()>;
}

pub struct PgProblemStore {
    pool: Pool<Postgres>,
}

impl PgProblemStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Serves a catalog page straight from durable storage, ordered by
    /// frontend identifier. Out-of-range inputs are silently corrected
    /// instead of rejected.
    pub async fn list_page(&self, page: i64, page_size: i64) -> Result<CatalogPage> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);

        let total_count: i64 = sqlx::query("SELECT COUNT(*) FROM problems")
            .map(|row: PgRow| row.get(0))
            .fetch_one(&self.pool)
            .await?;

        let offset = (page - 1) * page_size;
        let problems = sqlx::query_as::<_, Problem>(
            r#"
            SELECT frontend_id, title, slug, difficulty, acceptance_rate, is_premium, url
            FROM problems
            ORDER BY frontend_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(CatalogPage {
            problems,
            total_count,
            page,
            page_size,
            total_pages: total_pages(total_count, page_size),
        })
    }
}

#[async_trait]
impl ProblemStore for PgProblemStore {
    async fn upsert_batch(&self, batch: &[Problem]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO problems (frontend_id, title, slug, difficulty, acceptance_rate, is_premium, url) ",
        );
        query.push_values(batch, |mut row, problem| {
            row.push_bind(problem.frontend_id)
                .push_bind(&problem.title)
                .push_bind(&problem.slug)
                .push_bind(&problem.difficulty)
                .push_bind(problem.acceptance_rate)
                .push_bind(problem.is_premium)
                .push_bind(&problem.url);
        });
        query.push(
            " ON CONFLICT (frontend_id) DO UPDATE SET \
             title = EXCLUDED.title, \
             slug = EXCLUDED.slug, \
             difficulty = EXCLUDED.difficulty, \
             acceptance_rate = EXCLUDED.acceptance_rate, \
             is_premium = EXCLUDED.is_premium, \
             url = EXCLUDED.url",
        );

        query.build().execute(&self.pool).await?;

        Ok(())
    }
}

#[derive(Debug)]
pub struct CatalogPage {
    pub problems: Vec<Problem>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

fn clamp_page(page: i64) -> i64 {
    if page < 1 {
        DEFAULT_PAGE
    } else {
        page
    }
}

fn clamp_page_size(page_size: i64) -> i64 {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        MAX_PAGE_SIZE
    } else {
        page_size
    }
}

fn total_pages(total_count: i64, page_size: i64) -> i64 {
    (total_count + page_size - 1) / page_size
}
