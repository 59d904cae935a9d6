// src/models/practice.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::{PublicQuestion, Question};

/// A timed practice paper scored by marks rather than raw percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeTest {
    pub id: String,
    pub title: String,
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub questions: Vec<Question>,
    pub duration_minutes: u32,
    pub marks_per_question: f64,
    pub negative_marking: bool,
    pub created_at: DateTime<Utc>,
}

impl PracticeTest {
    pub fn max_marks(&self) -> f64 {
        self.marks_per_question * self.questions.len() as f64
    }
}

/// Outcome of the marks-minus-penalty strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub test_id: String,
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub marks: f64,
    pub penalty: f64,
    pub obtained_marks: f64,
    pub max_marks: f64,
    pub percentage: f64,
    pub time_taken: i64,
    pub submitted_at: DateTime<Utc>,
}

/// Practice paper as handed to the client (answer keys hidden).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPracticeTest {
    pub id: String,
    pub title: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub questions: Vec<PublicQuestion>,
    pub duration_minutes: u32,
    pub max_marks: f64,
    pub negative_marking: bool,
}

impl From<&PracticeTest> for PublicPracticeTest {
    fn from(test: &PracticeTest) -> Self {
        Self {
            id: test.id.clone(),
            title: test.title.clone(),
            subject_id: test.subject_id.clone(),
            chapter_id: test.chapter_id.clone(),
            questions: test.questions.iter().map(PublicQuestion::from).collect(),
            duration_minutes: test.duration_minutes,
            max_marks: test.max_marks(),
            negative_marking: test.negative_marking,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStats {
    pub attempts: usize,
    pub average_score: f64,
    pub best_scores: Vec<(String, f64)>,
}

/// DTO for creating a practice paper from a chapter.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePracticeTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject_id: String,
    #[validate(length(min = 1, max = 100))]
    pub chapter_id: String,
    #[validate(range(min = 1, max = 300))]
    pub duration_minutes: Option<u32>,
    #[validate(range(min = 0.25, max = 10.0))]
    pub marks_per_question: Option<f64>,
    #[serde(default)]
    pub negative_marking: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPracticeRequest {
    pub answers: Vec<Option<usize>>,
    pub time_taken: i64,
}
