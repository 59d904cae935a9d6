// src/services/scoring.rs

//! Two scoring strategies: quizzes report the
//! percentage of correct answers, practice papers report marks minus a
//! negative-marking penalty.

use chrono::{DateTime, Utc};

use crate::{
    config::NEGATIVE_MARKING_PENALTY,
    models::{
        practice::{PracticeResult, PracticeTest},
        test_record::{ScoreBreakdown, TestResult, TestSession},
    },
};

/// Percentage of correct answers, rounded to the nearest integer.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Grades a quiz session. Unanswered questions count as incorrect.
pub fn score_session(session: &TestSession, submitted_at: DateTime<Utc>) -> TestResult {
    let mut breakdown = ScoreBreakdown::default();
    let mut correct_answers = 0;

    for (question, answer) in session.questions.iter().zip(&session.user_answers) {
        let bucket = breakdown.bucket_mut(question.difficulty);
        bucket.total += 1;
        if question.is_correct(*answer) {
            bucket.correct += 1;
            correct_answers += 1;
        }
    }

    let total_questions = session.questions.len();
    let time_taken = (submitted_at - session.start_time).num_milliseconds().max(0);

    TestResult {
        test_id: session.test_id.clone(),
        score: percentage(correct_answers, total_questions),
        total_questions,
        correct_answers,
        time_taken,
        score_breakdown: breakdown,
        questions: session.questions.clone(),
        user_answers: session.user_answers.clone(),
        test_type: session.config.test_type,
        class_id: session.config.class_id.clone(),
        subject_id: session.config.subject_id.clone(),
        completed_at: submitted_at,
    }
}

/// Grades a practice paper: `marks_per_question` per correct answer,
/// minus 0.25 per wrong answer when negative marking is on. Unanswered
/// questions cost nothing. Obtained marks never drop below zero.
///
/// `answers` must be parallel to `test.questions`.
pub fn score_practice(
    test: &PracticeTest,
    answers: &[Option<usize>],
    time_taken: i64,
    submitted_at: DateTime<Utc>,
) -> PracticeResult {
    let mut correct = 0;
    let mut wrong = 0;
    let mut unanswered = 0;

    for (question, answer) in test.questions.iter().zip(answers) {
        match answer {
            None => unanswered += 1,
            Some(_) if question.is_correct(*answer) => correct += 1,
            Some(_) => wrong += 1,
        }
    }

    let marks = correct as f64 * test.marks_per_question;
    let penalty = if test.negative_marking {
        wrong as f64 * NEGATIVE_MARKING_PENALTY
    } else {
        0.0
    };
    let obtained_marks = (marks - penalty).max(0.0);
    let max_marks = test.max_marks();
    let percentage = if max_marks > 0.0 {
        obtained_marks / max_marks * 100.0
    } else {
        0.0
    };

    PracticeResult {
        test_id: test.id.clone(),
        correct,
        wrong,
        unanswered,
        marks,
        penalty,
        obtained_marks,
        max_marks,
        percentage,
        time_taken: time_taken.max(0),
        submitted_at,
    }
}
