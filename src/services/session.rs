// src/services/session.rs

//! Test session lifecycle: `NoSession -> Active -> (Submitted | Cancelled)
//! -> NoSession`, plus the append-only result history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    models::{
        question::Question,
        test_record::{TestConfig, TestResult, TestSession},
    },
    services::scoring::score_session,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No test is in progress")]
    NoActiveSession,
    #[error("Test '{0}' is already in progress")]
    SessionAlreadyActive(String),
    #[error("Cannot start a test without questions")]
    EmptyTest,
    #[error("Option {option} is out of range for a question with {available} options")]
    OptionOutOfRange { option: usize, available: usize },
    #[error("Question {index} is out of range for a test with {total} questions")]
    QuestionOutOfRange { index: usize, total: usize },
}

/// Holds the single active session and the submitted results.
///
/// Only `history` is persisted; an in-flight session does not survive a
/// restart.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TestStore {
    #[serde(skip)]
    active: Option<TestSession>,
    /// Oldest first.
    history: Vec<TestResult>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session. Refuses to replace a running one.
    pub fn start_test(
        &mut self,
        test_id: String,
        config: TestConfig,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<&TestSession, SessionError> {
        if let Some(active) = &self.active {
            return Err(SessionError::SessionAlreadyActive(active.test_id.clone()));
        }
        if questions.is_empty() {
            return Err(SessionError::EmptyTest);
        }

        tracing::info!(
            test_id = %test_id,
            test_type = ?config.test_type,
            questions = questions.len(),
            "test started"
        );

        let len = questions.len();
        Ok(self.active.insert(TestSession {
            test_id,
            questions,
            user_answers: vec![None; len],
            current_question_index: 0,
            start_time: now,
            config,
        }))
    }

    pub fn session(&self) -> Result<&TestSession, SessionError> {
        self.active.as_ref().ok_or(SessionError::NoActiveSession)
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        let session = self.session()?;
        Ok(&session.questions[session.current_question_index])
    }

    /// Records an answer for the current question. Last write wins.
    pub fn answer_question(&mut self, option: usize) -> Result<(), SessionError> {
        let session = self.active_mut()?;
        let index = session.current_question_index;
        let available = session.questions[index].options.len();
        if option >= available {
            return Err(SessionError::OptionOutOfRange { option, available });
        }
        session.user_answers[index] = Some(option);
        Ok(())
    }

    /// Moves forward, staying on the last question at the end.
    pub fn next_question(&mut self) -> Result<usize, SessionError> {
        let session = self.active_mut()?;
        if session.current_question_index + 1 < session.questions.len() {
            session.current_question_index += 1;
        }
        Ok(session.current_question_index)
    }

    /// Moves back, staying on the first question at the start.
    pub fn previous_question(&mut self) -> Result<usize, SessionError> {
        let session = self.active_mut()?;
        session.current_question_index = session.current_question_index.saturating_sub(1);
        Ok(session.current_question_index)
    }

    pub fn go_to_question(&mut self, index: usize) -> Result<usize, SessionError> {
        let session = self.active_mut()?;
        let total = session.questions.len();
        if index >= total {
            return Err(SessionError::QuestionOutOfRange { index, total });
        }
        session.current_question_index = index;
        Ok(index)
    }

    /// Scores the active session, appends the result to history and
    /// clears the session. A second call fails with `NoActiveSession`.
    pub fn submit_test(&mut self, now: DateTime<Utc>) -> Result<TestResult, SessionError> {
        let session = self.active.take().ok_or(SessionError::NoActiveSession)?;
        let result = score_session(&session, now);

        tracing::info!(
            test_id = %result.test_id,
            score = result.score,
            correct = result.correct_answers,
            total = result.total_questions,
            "test submitted"
        );

        self.history.push(result.clone());
        Ok(result)
    }

    /// Discards the active session without recording anything.
    pub fn cancel_test(&mut self) -> Result<(), SessionError> {
        let session = self.active.take().ok_or(SessionError::NoActiveSession)?;
        tracing::info!(test_id = %session.test_id, "test cancelled");
        Ok(())
    }

    /// Results, newest first.
    pub fn history(&self) -> impl Iterator<Item = &TestResult> {
        self.history.iter().rev()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn result(&self, test_id: &str) -> Option<&TestResult> {
        self.history.iter().find(|r| r.test_id == test_id)
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.history.clear();
    }

    fn active_mut(&mut self) -> Result<&mut TestSession, SessionError> {
        self.active.as_mut().ok_or(SessionError::NoActiveSession)
    }
}
