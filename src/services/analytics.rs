// src/services/analytics.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    models::{
        analytics::{AnalyticsSummary, SubjectPerformance, SubjectSummary},
        test_record::TestResult,
    },
};

/// Running counters over the learner's activity.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStore {
    quizzes_taken: u32,
    quizzes_passed: u32,
    total_score: u64,
    total_study_time_ms: i64,
    lessons_completed: BTreeSet<String>,
    credits_used: u32,
    subjects: BTreeMap<String, SubjectPerformance>,
}

impl AnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_test(&mut self, result: &TestResult) {
        self.quizzes_taken += 1;
        if result.score >= PASSING_SCORE_PERCENTAGE {
            self.quizzes_passed += 1;
        }
        self.total_score += u64::from(result.score);
        self.total_study_time_ms += result.time_taken;

        let subject = self
            .subjects
            .entry(result.subject_id.clone())
            .or_insert_with(|| SubjectPerformance {
                subject_id: result.subject_id.clone(),
                ..Default::default()
            });
        subject.attempts += 1;
        subject.total_score += u64::from(result.score);
        subject.best_score = subject.best_score.max(result.score);
    }

    /// Marks a lesson done. Returns `false` if it already was.
    pub fn complete_lesson(&mut self, concept_id: &str) -> bool {
        self.lessons_completed.insert(concept_id.to_string())
    }

    pub fn spend_credits(&mut self, credits: u32) {
        self.credits_used = self.credits_used.saturating_add(credits);
    }

    pub fn quizzes_passed(&self) -> u32 {
        self.quizzes_passed
    }

    pub fn lessons_completed(&self) -> usize {
        self.lessons_completed.len()
    }

    pub fn credits_used(&self) -> u32 {
        self.credits_used
    }

    pub fn summary(&self) -> AnalyticsSummary {
        let average_score = if self.quizzes_taken == 0 {
            0.0
        } else {
            self.total_score as f64 / f64::from(self.quizzes_taken)
        };

        AnalyticsSummary {
            quizzes_taken: self.quizzes_taken,
            quizzes_passed: self.quizzes_passed,
            average_score,
            total_study_time_ms: self.total_study_time_ms,
            lessons_completed: self.lessons_completed.len(),
            credits_used: self.credits_used,
            subjects: self
                .subjects
                .values()
                .map(|s| SubjectSummary {
                    subject_id: s.subject_id.clone(),
                    attempts: s.attempts,
                    average_score: s.average_score(),
                    best_score: s.best_score,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;
    use crate::services::scoring::{
        fixtures::{answer, at, question, session},
        score_session,
    };

    fn result(correct: usize, of: usize) -> TestResult {
        let questions = (0..of).map(|i| question(i, Difficulty::Easy)).collect();
        let mut s = session(questions, at(0));
        answer(&mut s, correct);
        score_session(&s, at(60))
    }

    #[test]
    fn test_record_test_counts_passes() {
        let mut store = AnalyticsStore::new();
        store.record_test(&result(6, 10));
        store.record_test(&result(5, 10));

        let summary = store.summary();
        assert_eq!(summary.quizzes_taken, 2);
        assert_eq!(summary.quizzes_passed, 1);
        assert_eq!(summary.average_score, 55.0);
        assert_eq!(summary.total_study_time_ms, 120_000);
        assert_eq!(summary.subjects.len(), 1);
        assert_eq!(summary.subjects[0].best_score, 60);
    }

    #[test]
    fn test_lessons_are_distinct() {
        let mut store = AnalyticsStore::new();
        assert!(store.complete_lesson("k1"));
        assert!(!store.complete_lesson("k1"));
        assert!(store.complete_lesson("k2"));
        assert_eq!(store.lessons_completed(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = AnalyticsStore::new().summary();
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.subjects.is_empty());
    }
}
