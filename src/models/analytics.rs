// src/models/analytics.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject_id: String,
    pub attempts: u32,
    pub total_score: u64,
    pub best_score: u32,
}

impl SubjectPerformance {
    pub fn average_score(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.attempts as f64
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject_id: String,
    pub attempts: u32,
    pub average_score: f64,
    pub best_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub quizzes_taken: u32,
    pub quizzes_passed: u32,
    pub average_score: f64,
    pub total_study_time_ms: i64,
    pub lessons_completed: usize,
    pub credits_used: u32,
    pub subjects: Vec<SubjectSummary>,
}

/// DTO for recording tutor credits spent.
#[derive(Debug, Deserialize, Validate)]
pub struct SpendCreditsRequest {
    #[validate(range(min = 1, max = 1000))]
    pub credits: u32,
}
