// src/services/leaderboard.rs

//! Points are always rebuilt from raw counters and the whole board is
//! re-sorted on every update. That is O(n) per update, fine for a
//! class-sized board.

use serde::{Deserialize, Serialize};

use crate::models::leaderboard::{LeaderboardEntry, LearnerStats, UserScore};

const POINTS_PER_LESSON: u32 = 20;
const POINTS_PER_QUIZ_PASSED: u32 = 50;
const POINTS_PER_BADGE: u32 = 100;
const POINTS_PER_STREAK_DAY: u32 = 10;
const POINTS_PER_CREDIT: u32 = 5;

/// Derives a learner's score from their counters.
pub fn compute_score(stats: &LearnerStats) -> UserScore {
    let streak_points = stats.streak_days.saturating_mul(POINTS_PER_STREAK_DAY);
    let total_points = stats
        .lessons_completed
        .saturating_mul(POINTS_PER_LESSON)
        .saturating_add(stats.quizzes_passed.saturating_mul(POINTS_PER_QUIZ_PASSED))
        .saturating_add(stats.badges.saturating_mul(POINTS_PER_BADGE))
        .saturating_add(streak_points)
        .saturating_add(stats.credits_used.saturating_mul(POINTS_PER_CREDIT));

    UserScore {
        user_id: stats.user_id.clone(),
        name: stats.name.clone(),
        class_id: stats.class_id.clone(),
        total_points,
        streak_points,
        credits_used: stats.credits_used,
        lessons_completed: stats.lessons_completed,
        quizzes_passed: stats.quizzes_passed,
        badges: stats.badges,
    }
}

fn peer(user_id: &str, name: &str, class_id: &str, counters: [u32; 5]) -> LearnerStats {
    let [lessons_completed, quizzes_passed, credits_used, streak_days, badges] = counters;
    LearnerStats {
        user_id: user_id.to_string(),
        name: name.to_string(),
        class_id: Some(class_id.to_string()),
        lessons_completed,
        quizzes_passed,
        credits_used,
        streak_days,
        badges,
    }
}

/// Classmates the board is seeded with.
pub fn default_peers() -> Vec<LearnerStats> {
    vec![
        peer("peer-aarav", "Aarav", "class-10", [42, 18, 12, 9, 5]),
        peer("peer-diya", "Diya", "class-10", [35, 22, 4, 14, 6]),
        peer("peer-kabir", "Kabir", "class-10", [18, 9, 20, 3, 2]),
        peer("peer-meera", "Meera", "class-9", [27, 12, 8, 6, 3]),
        peer("peer-rohan", "Rohan", "class-9", [10, 4, 0, 2, 1]),
        peer("peer-sara", "Sara", "class-10", [5, 2, 2, 1, 0]),
    ]
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    current_user_id: String,
    stats: Vec<LearnerStats>,
    /// Sorted by points desc, then name.
    #[serde(skip)]
    scores: Vec<UserScore>,
}

impl Leaderboard {
    pub fn new(current_user_id: impl Into<String>, stats: Vec<LearnerStats>) -> Self {
        let mut board = Self {
            current_user_id: current_user_id.into(),
            stats,
            scores: Vec::new(),
        };
        board.recompute();
        board
    }

    pub fn with_peers(current: LearnerStats) -> Self {
        let mut stats = default_peers();
        let user_id = current.user_id.clone();
        stats.push(current);
        Self::new(user_id, stats)
    }

    /// Rebuilds every score from counters and re-sorts.
    pub fn recompute(&mut self) {
        let mut scores: Vec<UserScore> = self.stats.iter().map(compute_score).collect();
        scores.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.name.cmp(&b.name))
        });
        self.scores = scores;
    }

    /// Replaces (or inserts) a learner's counters and returns their new
    /// overall rank.
    pub fn update(&mut self, stats: LearnerStats) -> Option<usize> {
        let user_id = stats.user_id.clone();
        match self.stats.iter_mut().find(|s| s.user_id == user_id) {
            Some(existing) => *existing = stats,
            None => self.stats.push(stats),
        }
        self.recompute();
        self.rank_of(&user_id)
    }

    #[cfg(test)]
    pub(crate) fn current_stats(&self) -> Option<&LearnerStats> {
        self.stats.iter().find(|s| s.user_id == self.current_user_id)
    }

    /// 1-based overall rank.
    pub fn rank_of(&self, user_id: &str) -> Option<usize> {
        self.scores
            .iter()
            .position(|s| s.user_id == user_id)
            .map(|idx| idx + 1)
    }

    /// Ranked rows, optionally limited to one class (ranks renumbered
    /// within the class).
    pub fn standings(&self, class_id: Option<&str>, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        self.scores
            .iter()
            .filter(|s| class_id.is_none() || s.class_id.as_deref() == class_id)
            .take(limit.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(idx, score)| LeaderboardEntry {
                rank: idx + 1,
                is_current_user: score.user_id == self.current_user_id,
                score: score.clone(),
            })
            .collect()
    }
}
