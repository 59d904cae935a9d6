// src/services/gamification.rs

//! Side effects of a submitted test: XP, daily streak, badges and the
//! leaderboard. Best effort only. A failing step is logged and skipped,
//! it never fails the submit itself.

use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::SPEED_RUN_THRESHOLD_MS,
    models::{
        achievement::Achievement,
        progress::{StreakState, XpItem, XpKind},
        question::Difficulty,
        test_record::TestResult,
    },
    services::{
        achievements::{
            AchievementError, CONCEPT_ACHIEVEMENTS, PERFECT_STREAK, QUIZ_COUNT_ACHIEVEMENTS,
            SPEED_RUNNER, WEEK_WARRIOR,
        },
        learner::LearnerState,
    },
};

pub const XP_CORRECT: u32 = 50;
pub const XP_CORRECT_HARD: u32 = 100;
pub const XP_ANSWER_STREAK: u32 = 20;
pub const XP_PERFECT_SCORE: u32 = 150;
/// An answer-streak bonus is paid on every n-th consecutive correct answer.
pub const ANSWER_STREAK_LENGTH: u32 = 3;

/// What the fan-out did, for display after submit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationOutcome {
    pub xp_awarded: u64,
    pub xp_items: Vec<XpItem>,
    pub unlocked: Vec<Achievement>,
    pub streak: StreakState,
    pub rank: Option<usize>,
}

/// XP batch for a result, in question order.
pub fn answer_xp(result: &TestResult) -> Vec<XpItem> {
    let mut items = Vec::new();
    let mut consecutive = 0;

    for (idx, (question, answer)) in result.questions.iter().zip(&result.user_answers).enumerate() {
        if !question.is_correct(*answer) {
            consecutive = 0;
            continue;
        }

        let amount = match question.difficulty {
            Difficulty::Hard => XP_CORRECT_HARD,
            Difficulty::Easy | Difficulty::Medium => XP_CORRECT,
        };
        items.push(XpItem::new(
            amount,
            XpKind::CorrectAnswer,
            format!("Correct answer to question {}", idx + 1),
        ));

        consecutive += 1;
        if consecutive % ANSWER_STREAK_LENGTH == 0 {
            items.push(XpItem::new(
                XP_ANSWER_STREAK,
                XpKind::AnswerStreak,
                format!("{} correct answers in a row", consecutive),
            ));
        }
    }

    if result.is_perfect() {
        items.push(XpItem::new(XP_PERFECT_SCORE, XpKind::PerfectScore, "Perfect score"));
    }
    items
}

/// Number of 100% results at the head of history, stopping at the first
/// imperfect one.
pub fn perfect_run<'a>(history_newest_first: impl Iterator<Item = &'a TestResult>) -> usize {
    history_newest_first.take_while(|r| r.is_perfect()).count()
}

/// Distinct concepts across all results.
pub fn distinct_concepts<'a>(history: impl Iterator<Item = &'a TestResult>) -> usize {
    history
        .flat_map(|r| &r.questions)
        .filter_map(|q| q.related_concept.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Runs every side effect of a submitted result. `result` must already be
/// in the learner's history.
pub fn apply_gamification(
    learner: &mut LearnerState,
    result: &TestResult,
    now: DateTime<Utc>,
) -> GamificationOutcome {
    let xp_items = answer_xp(result);
    let mut xp_awarded = learner.progress.add_xp_batch(xp_items.clone(), now);

    let streak = learner.progress.record_activity(now.date_naive()).clone();
    learner.analytics.record_test(result);

    let mut unlocked = Vec::new();

    // Badge checks, in order. Each one stands alone.
    let completed = learner.tests.history_len() as u32;
    for id in QUIZ_COUNT_ACHIEVEMENTS {
        check(&mut unlocked, learner.achievements.update_progress(id, completed, now));
    }

    if result.time_taken < SPEED_RUN_THRESHOLD_MS {
        check(&mut unlocked, learner.achievements.update_progress(SPEED_RUNNER, 1, now));
    }

    let perfect = perfect_run(learner.tests.history()) as u32;
    check(&mut unlocked, learner.achievements.update_progress(PERFECT_STREAK, perfect, now));

    let concepts = distinct_concepts(learner.tests.history()) as u32;
    for id in CONCEPT_ACHIEVEMENTS {
        check(&mut unlocked, learner.achievements.update_progress(id, concepts, now));
    }

    check(
        &mut unlocked,
        learner.achievements.update_progress(WEEK_WARRIOR, streak.current, now),
    );

    if !unlocked.is_empty() {
        let rewards: Vec<XpItem> = unlocked
            .iter()
            .map(|a| XpItem::new(a.reward, XpKind::Achievement, format!("Unlocked {}", a.title)))
            .collect();
        xp_awarded += learner.progress.add_xp_batch(rewards, now);
    }

    let rank = learner.refresh_leaderboard(now.date_naive());

    tracing::info!(
        test_id = %result.test_id,
        xp = xp_awarded,
        unlocked = unlocked.len(),
        rank = ?rank,
        "gamification applied"
    );

    GamificationOutcome {
        xp_awarded,
        xp_items,
        unlocked,
        streak,
        rank,
    }
}

fn check(unlocked: &mut Vec<Achievement>, outcome: Result<Option<Achievement>, AchievementError>) {
    if let Some(achievement) = best_effort("achievement", outcome).flatten() {
        unlocked.push(achievement);
    }
}

fn best_effort<T, E: Display>(step: &str, outcome: Result<T, E>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(step, error = %e, "gamification step failed");
            None
        }
    }
}
