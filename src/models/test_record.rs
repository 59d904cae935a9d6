// src/models/test_record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::{Difficulty, PublicQuestion, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// 3-5 questions drawn from a single topic.
    Quick,
    /// Up to 15 questions spanning a whole chapter.
    Chapter,
}

/// Where a test's questions were drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    pub test_type: TestType,
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: Option<String>,
    pub topic_id: Option<String>,
}

/// The in-progress attempt. At most one exists at a time.
///
/// `user_answers` is parallel to `questions`; `None` means unanswered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub test_id: String,
    pub questions: Vec<Question>,
    pub user_answers: Vec<Option<usize>>,
    pub current_question_index: usize,
    pub start_time: DateTime<Utc>,
    #[serde(flatten)]
    pub config: TestConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketScore {
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub easy: BucketScore,
    pub medium: BucketScore,
    pub hard: BucketScore,
}

impl ScoreBreakdown {
    pub fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut BucketScore {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    pub fn total(&self) -> usize {
        self.easy.total + self.medium.total + self.hard.total
    }
}

/// Outcome of a submitted session. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_id: String,
    /// Percentage 0-100.
    pub score: u32,
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Milliseconds between start and submit.
    pub time_taken: i64,
    pub score_breakdown: ScoreBreakdown,
    pub questions: Vec<Question>,
    pub user_answers: Vec<Option<usize>>,
    pub test_type: TestType,
    pub class_id: String,
    pub subject_id: String,
    pub completed_at: DateTime<Utc>,
}

impl TestResult {
    pub fn is_perfect(&self) -> bool {
        self.total_questions > 0 && self.correct_answers == self.total_questions
    }
}

/// Snapshot of the running session for the client (answers hidden).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub test_id: String,
    pub test_type: TestType,
    pub questions: Vec<PublicQuestion>,
    pub user_answers: Vec<Option<usize>>,
    pub current_question_index: usize,
    pub current_question: PublicQuestion,
    pub answered_count: usize,
    pub start_time: DateTime<Utc>,
}

impl From<&TestSession> for SessionView {
    fn from(session: &TestSession) -> Self {
        let questions: Vec<PublicQuestion> =
            session.questions.iter().map(PublicQuestion::from).collect();
        let current_question = PublicQuestion::from(&session.questions[session.current_question_index]);

        Self {
            test_id: session.test_id.clone(),
            test_type: session.config.test_type,
            questions,
            user_answers: session.user_answers.clone(),
            current_question_index: session.current_question_index,
            current_question,
            answered_count: session.user_answers.iter().filter(|a| a.is_some()).count(),
            start_time: session.start_time,
        }
    }
}

/// DTO for starting a quick test on one topic.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartQuickTestRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject_id: String,
    #[validate(length(min = 1, max = 100))]
    pub chapter_id: String,
    #[validate(length(min = 1, max = 100))]
    pub topic_id: String,
}

/// DTO for starting a chapter test.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartChapterTestRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject_id: String,
    #[validate(length(min = 1, max = 100))]
    pub chapter_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub option: usize,
}

#[derive(Debug, Deserialize)]
pub struct GoToRequest {
    pub index: usize,
}
