use crate::types::{
    error::{Result, TrackerError},
    tables::ProgressEntry,
};
use serde::Deserialize;
use sqlx::{postgres::Postgres, Pool};

/// Point-in-time solved totals supplied by the caller. Snapshots are never
/// accumulated; a later snapshot for the same day replaces the earlier one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounts {
    pub total: i32,
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
}

/// Typed shape of the provider's user-stats payload.
#[derive(Debug, Deserialize)]
pub struct MatchedUserStats {
    pub username: String,
    #[serde(rename = "submitStats")]
    pub submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
pub struct SubmitStats {
    #[serde(rename = "acSubmissionNum")]
    pub ac_submission_num: Vec<SubmissionCount>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionCount {
    pub difficulty: String,
    pub count: i32,
}

impl MatchedUserStats {
    pub fn parse(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| TrackerError::Validation(format!("malformed user stats payload: {}", e)))
    }
}

impl ProgressCounts {
    pub fn from_stats(stats: &MatchedUserStats) -> Self {
        let mut counts = ProgressCounts::default();
        for bucket in &stats.submit_stats.ac_submission_num {
            match bucket.difficulty.as_str() {
                "All" => counts.total = bucket.count,
                "Easy" => counts.easy = bucket.count,
                "Medium" => counts.medium = bucket.count,
                "Hard" => counts.hard = bucket.count,
                other => tracing::debug!("ignoring unknown difficulty bucket {}", other),
            }
        }

        counts
    }
}

pub struct ProgressStore {
    pool: Pool<Postgres>,
}

impl ProgressStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Upserts today's snapshot for the user; a conflict overwrites all
    /// four counters (last write wins).
    pub async fn record(&self, username: &str, counts: &ProgressCounts) -> Result<()> {
        if username.is_empty() {
            return Err(TrackerError::Validation(String::from(
                "username must not be empty",
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO user_progress (username, date, total_solved, easy_solved, medium_solved, hard_solved)
            VALUES ($1, CURRENT_DATE, $2, $3, $4, $5)
            ON CONFLICT (username, date) DO UPDATE
            SET total_solved = $2, easy_solved = $3, medium_solved = $4, hard_solved = $5
            "#,
        )
        .bind(username)
        .bind(counts.total)
        .bind(counts.easy)
        .bind(counts.medium)
        .bind(counts.hard)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn history(&self, username: &str) -> Result<Vec<ProgressEntry>> {
        let entries = sqlx::query_as::<_, ProgressEntry>(
            r#"
            SELECT date, total_solved, easy_solved, medium_solved, hard_solved
            FROM user_progress
            WHERE username = $1
            ORDER BY date ASC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stats_payload_parses_into_counts() {
        let payload = r#"
        {
            "username": "grinder",
            "submitStats": {
                "acSubmissionNum": [
                    {"difficulty": "All", "count": 120, "submissions": 300},
                    {"difficulty": "Easy", "count": 60, "submissions": 90},
                    {"difficulty": "Medium", "count": 45, "submissions": 150},
                    {"difficulty": "Hard", "count": 15, "submissions": 60}
                ]
            }
        }"#;

        let stats = MatchedUserStats::parse(payload).unwrap();
        assert_eq!(stats.username, "grinder");

        let counts = ProgressCounts::from_stats(&stats);
        assert_eq!(
            counts,
            ProgressCounts {
                total: 120,
                easy: 60,
                medium: 45,
                hard: 15,
            }
        );
    }

    #[test]
    fn unknown_difficulty_buckets_are_ignored() {
        let payload = r#"
        {
            "username": "grinder",
            "submitStats": {
                "acSubmissionNum": [
                    {"difficulty": "All", "count": 10},
                    {"difficulty": "Extreme", "count": 99}
                ]
            }
        }"#;

        let counts = ProgressCounts::from_stats(&MatchedUserStats::parse(payload).unwrap());
        assert_eq!(counts.total, 10);
        assert_eq!(counts.hard, 0);
    }

    #[test]
    fn malformed_stats_payloads_are_a_validation_error() {
        let result = MatchedUserStats::parse(r#"{"username": "grinder"}"#);
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }
}
