use crate::types::{
    error::{Result, TrackerError},
    tables::{List, ListItem},
};
use serde::Deserialize;
use sqlx::{
    postgres::{PgRow, Postgres},
    Pool, Row,
};
use validator::Validate;

/// User-supplied metadata for a new list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewList {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub notes: String,
}

/// Operations on user-owned lists and their membership edges.
///
/// Every lookup and write resolves the list by (id, user id); a list owned
/// by another user is reported as not found, never as a distinct outcome.
pub struct ListService {
    pool: Pool<Postgres>,
}

impl ListService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Idempotently creates the identity row for an external subject.
    pub async fn ensure_user_exists(&self, user_id: &str) -> Result<()> {
        sqlx::query("INSERT INTO users (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn create_list(&self, user_id: &str, list: &NewList) -> Result<i64> {
        list.validate()
            .map_err(|e| TrackerError::Validation(e.to_string().replace('\n', ", ")))?;
        self.ensure_user_exists(user_id).await?;

        let list_id: i64 = sqlx::query(
            r#"
            INSERT INTO lists (user_id, name, description, tags, difficulty, estimated_time, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.tags)
        .bind(&list.difficulty)
        .bind(&list.estimated_time)
        .bind(&list.notes)
        .map(|row: PgRow| row.get(0))
        .fetch_one(&self.pool)
        .await
        .map_err(TrackerError::from_sqlx)?;

        tracing::info!("created list {} for user {}", list_id, user_id);

        Ok(list_id)
    }

    pub async fn get_list(&self, list_id: i64, user_id: &str) -> Result<List> {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, user_id, name, description, tags, difficulty, estimated_time, notes, created_at
            FROM lists
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| TrackerError::NotFound(format!("list {}", list_id)))
    }

    pub async fn list_user_lists(&self, user_id: &str) -> Result<Vec<List>> {
        let lists = sqlx::query_as::<_, List>(
            r#"
            SELECT id, user_id, name, description, tags, difficulty, estimated_time, notes, created_at
            FROM lists
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    pub async fn get_list_items(&self, list_id: i64, user_id: &str) -> Result<Vec<ListItem>> {
        self.get_list(list_id, user_id).await?;

        let items = sqlx::query_as::<_, ListItem>(
            r#"
            SELECT li.id, li.list_id, li.problem_id,
                   p.title AS problem_title, p.difficulty AS problem_difficulty,
                   p.acceptance_rate, p.is_premium, p.url,
                   li.completed, li.added_at
            FROM list_items li
            JOIN problems p ON li.problem_id = p.frontend_id
            WHERE li.list_id = $1
            ORDER BY li.id ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Adds catalog problems to a list, all or nothing.
    ///
    /// Runs in a single transaction: each id is checked against the
    /// catalog, the first missing id rolls everything back, and a pair
    /// that is already present is skipped rather than treated as an
    /// error. Either every requested valid problem is committed or the
    /// list is unchanged.
    pub async fn add_problems_to_list(
        &self,
        list_id: i64,
        user_id: &str,
        problem_ids: &[i64],
    ) -> Result<()> {
        if problem_ids.is_empty() {
            return Err(TrackerError::Validation(String::from(
                "problem id list must not be empty",
            )));
        }
        self.get_list(list_id, user_id).await?;

        let mut tx = self.pool.begin().await?;

        for &problem_id in problem_ids {
            let exists = sqlx::query("SELECT EXISTS(SELECT 1 FROM problems WHERE frontend_id = $1)")
                .bind(problem_id)
                .map(|row: PgRow| row.get::<bool, _>(0))
                .fetch_one(&mut tx)
                .await;
            let exists = match exists {
                Ok(exists) => exists,
                Err(e) => {
                    tx.rollback().await?;
                    return Err(TrackerError::Database(e));
                }
            };
            if !exists {
                tx.rollback().await?;
                return Err(TrackerError::Validation(format!(
                    "problem {} is not in the catalog",
                    problem_id
                )));
            }

            let result = sqlx::query(
                r#"
                INSERT INTO list_items (list_id, problem_id)
                VALUES ($1, $2)
                ON CONFLICT (list_id, problem_id) DO NOTHING
                "#,
            )
            .bind(list_id)
            .bind(problem_id)
            .execute(&mut tx)
            .await;
            if let Err(e) = result {
                tx.rollback().await?;
                return Err(TrackerError::Database(e));
            }
        }

        tx.commit().await?;
        tracing::info!("added {} problems to list {}", problem_ids.len(), list_id);

        Ok(())
    }

    pub async fn remove_problem_from_list(
        &self,
        list_id: i64,
        user_id: &str,
        problem_id: i64,
    ) -> Result<()> {
        self.get_list(list_id, user_id).await?;

        let result = sqlx::query("DELETE FROM list_items WHERE list_id = $1 AND problem_id = $2")
            .bind(list_id)
            .bind(problem_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound(format!(
                "problem {} in list {}",
                problem_id, list_id
            )));
        }

        Ok(())
    }

    /// Deleting a list cascades to its membership edges.
    pub async fn delete_list(&self, list_id: i64, user_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1 AND user_id = $2")
            .bind(list_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound(format!("list {}", list_id)));
        }

        Ok(())
    }

    pub async fn set_item_completion(
        &self,
        list_id: i64,
        user_id: &str,
        item_id: i64,
        completed: bool,
    ) -> Result<()> {
        self.get_list(list_id, user_id).await?;

        let result = sqlx::query("UPDATE list_items SET completed = $1 WHERE id = $2 AND list_id = $3")
            .bind(completed)
            .bind(item_id)
            .bind(list_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound(format!("list item {}", item_id)));
        }

        Ok(())
    }
}
