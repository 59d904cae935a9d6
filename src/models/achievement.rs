// src/models/achievement.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Quiz,
    Speed,
    Mastery,
    Learning,
    Dedication,
}

/// Static catalogue entry.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub max_progress: u32,
    /// XP granted on unlock.
    pub reward: u32,
}

impl AchievementDefinition {
    pub const fn new(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        category: AchievementCategory,
        max_progress: u32,
        reward: u32,
    ) -> Self {
        Self {
            id,
            title,
            description,
            category,
            max_progress,
            reward,
        }
    }
}

/// Per-learner progress row for one achievement.
///
/// `progress` only moves up, `unlocked_at` is set once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub progress: u32,
    pub max_progress: u32,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub reward: u32,
}

impl Achievement {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

impl From<&AchievementDefinition> for Achievement {
    fn from(def: &AchievementDefinition) -> Self {
        Self {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            category: def.category,
            progress: 0,
            max_progress: def.max_progress,
            unlocked_at: None,
            reward: def.reward,
        }
    }
}
