use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Problem {
    pub frontend_id: i64,
    pub title: String,
    pub slug: String,
    pub difficulty: String,
    pub acceptance_rate: f64,
    pub is_premium: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct List {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub tags: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub notes: String,
    pub created_at: DateTime<Local>,
}

/// Membership edge joined with the catalog columns the owning list's
/// consumers need.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListItem {
    pub id: i64,
    pub list_id: i64,
    pub problem_id: i64,
    pub problem_title: String,
    pub problem_difficulty: String,
    pub acceptance_rate: f64,
    pub is_premium: bool,
    pub url: String,
    pub completed: bool,
    pub added_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,
}
