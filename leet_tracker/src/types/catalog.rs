use crate::types::tables::Problem;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Numeric tier as reported by the catalog source. Anything outside the
    /// two known extremes is treated as Medium.
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Difficulty::Easy,
            3 => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw catalog payload served by the source endpoint. Only the fields the
/// transform consumes are modeled; unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub num_total: i64,
    pub stat_status_pairs: Vec<StatStatusPair>,
}

#[derive(Debug, Deserialize)]
pub struct StatStatusPair {
    pub stat: ProblemStat,
    pub difficulty: DifficultyLevel,
    pub paid_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyLevel {
    pub level: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProblemStat {
    #[serde(rename = "question__title")]
    pub title: String,
    #[serde(rename = "question__title_slug")]
    pub slug: String,
    #[serde(rename = "total_acs")]
    pub total_accepted: i64,
    #[serde(rename = "total_submitted")]
    pub total_submitted: i64,
    #[serde(rename = "frontend_question_id")]
    pub frontend_id: i64,
}

impl CatalogResponse {
    /// Normalizes the raw entries into catalog records: acceptance rate in
    /// percent rounded half-up to two decimals, difficulty mapped from the
    /// numeric tier, canonical URL synthesized from the slug.
    pub fn into_problems(self) -> Vec<Problem> {
        self.stat_status_pairs
            .into_iter()
            .map(|pair| {
                let acceptance_rate = if pair.stat.total_submitted > 0 {
                    round_to_two_decimals(
                        pair.stat.total_accepted as f64 / pair.stat.total_submitted as f64 * 100.0,
                    )
                } else {
                    0.0
                };
                let url = format!("https://leetcode.com/problems/{}/", pair.stat.slug);

                Problem {
                    frontend_id: pair.stat.frontend_id,
                    title: pair.stat.title,
                    slug: pair.stat.slug,
                    difficulty: Difficulty::from_level(pair.difficulty.level).to_string(),
                    acceptance_rate,
                    is_premium: pair.paid_only,
                    url,
                }
            })
            .collect()
    }
}

fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod test {
    use super::*;

    fn pair(level: i64, accepted: i64, submitted: i64) -> StatStatusPair {
        StatStatusPair {
            stat: ProblemStat {
                title: String::from("Two Sum"),
                slug: String::from("two-sum"),
                total_accepted: accepted,
                total_submitted: submitted,
                frontend_id: 1,
            },
            difficulty: DifficultyLevel { level },
            paid_only: false,
        }
    }

    #[test]
    fn difficulty_levels_map_to_tiers() {
        assert_eq!(Difficulty::from_level(1), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(3), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(2), Difficulty::Medium);
        assert_eq!(Difficulty::from_level(0), Difficulty::Medium);
        assert_eq!(Difficulty::from_level(42), Difficulty::Medium);
    }

    #[test]
    fn acceptance_rate_rounds_half_up_to_two_decimals() {
        let response = CatalogResponse {
            num_total: 1,
            stat_status_pairs: vec![pair(1, 37, 123)],
        };
        let problems = response.into_problems();

        assert_eq!(problems[0].acceptance_rate, 30.08);
    }

    #[test]
    fn zero_submissions_yield_zero_acceptance() {
        let response = CatalogResponse {
            num_total: 1,
            stat_status_pairs: vec![pair(1, 0, 0)],
        };
        let problems = response.into_problems();

        assert_eq!(problems[0].acceptance_rate, 0.0);
    }

    #[test]
    fn url_is_synthesized_from_the_slug() {
        let response = CatalogResponse {
            num_total: 1,
            stat_status_pairs: vec![pair(2, 1, 2)],
        };
        let problems = response.into_problems();

        assert_eq!(problems[0].url, "https://leetcode.com/problems/two-sum/");
        assert_eq!(problems[0].difficulty, "Medium");
    }

    #[test]
    fn raw_payload_deserializes_with_source_field_names() {
        let payload = r#"
        {
            "user_name": "",
            "num_solved": 0,
            "num_total": 2,
            "stat_status_pairs": [
                {
                    "stat": {
                        "question_id": 3,
                        "question__title": "Longest Substring Without Repeating Characters",
                        "question__title_slug": "longest-substring-without-repeating-characters",
                        "total_acs": 100,
                        "total_submitted": 300,
                        "frontend_question_id": 3
                    },
                    "status": null,
                    "difficulty": {"level": 2},
                    "paid_only": true
                }
            ]
        }"#;

        let response: CatalogResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.num_total, 2);

        let problems = response.into_problems();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].frontend_id, 3);
        assert_eq!(problems[0].acceptance_rate, 33.33);
        assert!(problems[0].is_premium);
    }
}
