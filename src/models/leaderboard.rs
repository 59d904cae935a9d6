// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};

/// Raw counters a learner's points are derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerStats {
    pub user_id: String,
    pub name: String,
    pub class_id: Option<String>,
    pub lessons_completed: u32,
    pub quizzes_passed: u32,
    pub credits_used: u32,
    pub streak_days: u32,
    pub badges: u32,
}

/// Derived standing. Recomputed from `LearnerStats`, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScore {
    pub user_id: String,
    pub name: String,
    pub class_id: Option<String>,
    pub total_points: u32,
    pub streak_points: u32,
    pub credits_used: u32,
    pub lessons_completed: u32,
    pub quizzes_passed: u32,
    pub badges: u32,
}

/// Aggregated row for displaying the leaderboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub score: UserScore,
    pub is_current_user: bool,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub class_id: Option<String>,
    pub limit: Option<usize>,
}
