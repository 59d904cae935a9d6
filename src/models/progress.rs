// src/models/progress.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpKind {
    CorrectAnswer,
    AnswerStreak,
    PerfectScore,
    Achievement,
}

/// One line of an XP batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpItem {
    pub amount: u32,
    #[serde(rename = "type")]
    pub kind: XpKind,
    pub description: String,
}

impl XpItem {
    pub fn new(amount: u32, kind: XpKind, description: impl Into<String>) -> Self {
        Self {
            amount,
            kind,
            description: description.into(),
        }
    }
}

/// Ledger entry for an awarded XP item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpEvent {
    #[serde(flatten)]
    pub item: XpItem,
    pub awarded_at: DateTime<Utc>,
}

/// Daily activity streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_active: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_xp: u64,
    pub level: u32,
    pub title: &'static str,
    pub xp_in_level: u64,
    pub xp_for_level: u64,
    pub streak: StreakState,
    pub recent_xp: Vec<XpEvent>,
}
