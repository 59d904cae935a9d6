// src/services/practice.rs

//! Practice papers: generated once from a chapter, attempted any number
//! of times, scored with marks minus the negative-marking penalty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    models::{
        practice::{PracticeResult, PracticeStats, PracticeTest},
        question::Question,
    },
    services::scoring::score_practice,
};

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_MARKS_PER_QUESTION: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum PracticeError {
    #[error("Practice test '{0}' not found")]
    UnknownTest(String),
    #[error("Cannot create a practice test without questions")]
    NoQuestions,
    #[error("Expected {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },
    #[error("Question {question} has {available} options, got option {option}")]
    OptionOutOfRange { question: usize, option: usize, available: usize },
}

/// Settings for a new practice paper.
#[derive(Debug, Clone)]
pub struct PracticeDraft {
    pub title: String,
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub duration_minutes: u32,
    pub marks_per_question: f64,
    pub negative_marking: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PracticeTestStore {
    tests: Vec<PracticeTest>,
    attempts: Vec<PracticeResult>,
}

impl PracticeTestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_test(
        &mut self,
        id: String,
        draft: PracticeDraft,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<&PracticeTest, PracticeError> {
        if questions.is_empty() {
            return Err(PracticeError::NoQuestions);
        }

        tracing::info!(test_id = %id, questions = questions.len(), "practice test created");

        self.tests.push(PracticeTest {
            id,
            title: draft.title,
            class_id: draft.class_id,
            subject_id: draft.subject_id,
            chapter_id: draft.chapter_id,
            questions,
            duration_minutes: draft.duration_minutes,
            marks_per_question: draft.marks_per_question,
            negative_marking: draft.negative_marking,
            created_at: now,
        });
        Ok(&self.tests[self.tests.len() - 1])
    }

    pub fn tests(&self) -> &[PracticeTest] {
        &self.tests
    }

    pub fn test(&self, test_id: &str) -> Result<&PracticeTest, PracticeError> {
        self.tests
            .iter()
            .find(|t| t.id == test_id)
            .ok_or_else(|| PracticeError::UnknownTest(test_id.to_string()))
    }

    /// Scores and records an attempt. `answers` must be parallel to the
    /// paper's questions.
    pub fn submit_attempt(
        &mut self,
        test_id: &str,
        answers: &[Option<usize>],
        time_taken: i64,
        now: DateTime<Utc>,
    ) -> Result<PracticeResult, PracticeError> {
        let test = self.test(test_id)?;
        if answers.len() != test.questions.len() {
            return Err(PracticeError::AnswerCountMismatch {
                expected: test.questions.len(),
                got: answers.len(),
            });
        }
        for (question, (q, answer)) in test.questions.iter().zip(answers).enumerate() {
            if let Some(option) = *answer {
                if option >= q.options.len() {
                    return Err(PracticeError::OptionOutOfRange {
                        question,
                        option,
                        available: q.options.len(),
                    });
                }
            }
        }

        let result = score_practice(test, answers, time_taken, now);
        tracing::info!(
            test_id,
            obtained = result.obtained_marks,
            max = result.max_marks,
            "practice attempt scored"
        );
        self.attempts.push(result.clone());
        Ok(result)
    }

    pub fn attempts_for<'a>(&'a self, test_id: &'a str) -> impl Iterator<Item = &'a PracticeResult> {
        self.attempts.iter().filter(move |a| a.test_id == test_id)
    }

    /// Mean percentage over every attempt.
    pub fn average_score(&self) -> f64 {
        if self.attempts.is_empty() {
            return 0.0;
        }
        self.attempts.iter().map(|a| a.percentage).sum::<f64>() / self.attempts.len() as f64
    }

    pub fn best_score(&self, test_id: &str) -> Option<f64> {
        self.attempts_for(test_id)
            .map(|a| a.percentage)
            .fold(None, |best, p| Some(best.map_or(p, |b: f64| b.max(p))))
    }

    pub fn stats(&self) -> PracticeStats {
        PracticeStats {
            attempts: self.attempts.len(),
            average_score: self.average_score(),
            best_scores: self
                .tests
                .iter()
                .filter_map(|t| self.best_score(&t.id).map(|s| (t.id.clone(), s)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;
    use crate::services::scoring::fixtures::{at, question};

    fn draft(negative_marking: bool) -> PracticeDraft {
        PracticeDraft {
            title: "Chapter 1 mock".to_string(),
            class_id: "c10".to_string(),
            subject_id: "sci".to_string(),
            chapter_id: "ch1".to_string(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            marks_per_question: DEFAULT_MARKS_PER_QUESTION,
            negative_marking,
        }
    }

    fn store_with_test(negative_marking: bool) -> PracticeTestStore {
        let mut store = PracticeTestStore::new();
        let questions = (0..4).map(|i| question(i, Difficulty::Easy)).collect();
        store
            .create_test("p1".to_string(), draft(negative_marking), questions, at(0))
            .unwrap();
        store
    }

    #[test]
    fn test_create_requires_questions() {
        let mut store = PracticeTestStore::new();
        let err = store
            .create_test("p1".to_string(), draft(false), vec![], at(0))
            .unwrap_err();
        assert_eq!(err, PracticeError::NoQuestions);
    }

    #[test]
    fn test_submit_checks_answer_count() {
        let mut store = store_with_test(true);
        assert_eq!(
            store.submit_attempt("p1", &[Some(0)], 10, at(1)),
            Err(PracticeError::AnswerCountMismatch { expected: 4, got: 1 })
        );
    }

    #[test]
    fn test_submit_rejects_out_of_range_option() {
        let mut store = store_with_test(true);
        let available = store.test("p1").unwrap().questions[1].options.len();
        assert_eq!(
            store.submit_attempt("p1", &[Some(0), Some(9), None, None], 10, at(1)),
            Err(PracticeError::OptionOutOfRange { question: 1, option: 9, available })
        );
        // Nothing was recorded
        assert_eq!(store.attempts_for("p1").count(), 0);
    }

    #[test]
    fn test_submit_unknown_test() {
        let mut store = PracticeTestStore::new();
        assert_eq!(
            store.submit_attempt("nope", &[], 10, at(1)),
            Err(PracticeError::UnknownTest("nope".to_string()))
        );
    }

    #[test]
    fn test_average_and_best() {
        let mut store = store_with_test(false);
        // all four right -> 100%
        store
            .submit_attempt("p1", &[Some(0), Some(1), Some(2), Some(3)], 10, at(1))
            .unwrap();
        // two right -> 50%
        store
            .submit_attempt("p1", &[Some(0), Some(1), None, None], 10, at(2))
            .unwrap();

        assert_eq!(store.average_score(), 75.0);
        assert_eq!(store.best_score("p1"), Some(100.0));
        assert_eq!(store.attempts_for("p1").count(), 2);

        let stats = store.stats();
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.best_scores, vec![("p1".to_string(), 100.0)]);
    }

    #[test]
    fn test_negative_marking_feeds_average() {
        let mut store = store_with_test(true);
        // one right, three wrong: 1 - 0.75 = 0.25 of 4 marks
        let result = store
            .submit_attempt("p1", &[Some(0), Some(0), Some(0), Some(0)], 10, at(1))
            .unwrap();
        assert_eq!(result.obtained_marks, 0.25);
        assert_eq!(store.average_score(), 6.25);
    }
}
