// src/services/achievements.rs

//! Achievement catalogue and per-learner progress tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::achievement::{Achievement, AchievementCategory, AchievementDefinition};

pub const FIRST_QUIZ: &str = "first_quiz";
pub const QUIZ_ENTHUSIAST: &str = "quiz_enthusiast";
pub const QUIZ_MASTER: &str = "quiz_master";
pub const SPEED_RUNNER: &str = "speed_runner";
pub const PERFECT_STREAK: &str = "perfect_streak";
pub const CONCEPT_EXPLORER: &str = "concept_explorer";
pub const KNOWLEDGE_SEEKER: &str = "knowledge_seeker";
pub const WEEK_WARRIOR: &str = "week_warrior";
pub const LESSON_LEARNER: &str = "lesson_learner";

/// Achievements driven by the number of completed quizzes.
pub const QUIZ_COUNT_ACHIEVEMENTS: [&str; 3] = [FIRST_QUIZ, QUIZ_ENTHUSIAST, QUIZ_MASTER];
/// Achievements driven by distinct concepts seen in quizzes.
pub const CONCEPT_ACHIEVEMENTS: [&str; 2] = [CONCEPT_EXPLORER, KNOWLEDGE_SEEKER];

/// All available achievements.
pub const CATALOGUE: &[AchievementDefinition] = &[
    AchievementDefinition::new(
        FIRST_QUIZ,
        "First Steps",
        "Complete your first quiz",
        AchievementCategory::Quiz,
        1,
        50,
    ),
    AchievementDefinition::new(
        QUIZ_ENTHUSIAST,
        "Quiz Enthusiast",
        "Complete 10 quizzes",
        AchievementCategory::Quiz,
        10,
        200,
    ),
    AchievementDefinition::new(
        QUIZ_MASTER,
        "Quiz Master",
        "Complete 50 quizzes",
        AchievementCategory::Quiz,
        50,
        500,
    ),
    AchievementDefinition::new(
        SPEED_RUNNER,
        "Speed Runner",
        "Finish a quiz in under 2 minutes",
        AchievementCategory::Speed,
        1,
        100,
    ),
    AchievementDefinition::new(
        PERFECT_STREAK,
        "Perfectionist",
        "Score 100% on 3 quizzes in a row",
        AchievementCategory::Mastery,
        3,
        300,
    ),
    AchievementDefinition::new(
        CONCEPT_EXPLORER,
        "Concept Explorer",
        "Meet 25 different concepts in quizzes",
        AchievementCategory::Learning,
        25,
        150,
    ),
    AchievementDefinition::new(
        KNOWLEDGE_SEEKER,
        "Knowledge Seeker",
        "Meet 100 different concepts in quizzes",
        AchievementCategory::Learning,
        100,
        400,
    ),
    AchievementDefinition::new(
        WEEK_WARRIOR,
        "Week Warrior",
        "Study 7 days in a row",
        AchievementCategory::Dedication,
        7,
        250,
    ),
    AchievementDefinition::new(
        LESSON_LEARNER,
        "Lesson Learner",
        "Complete 10 lessons",
        AchievementCategory::Learning,
        10,
        100,
    ),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AchievementError {
    #[error("Achievement '{0}' not found")]
    UnknownAchievement(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementStore {
    achievements: Vec<Achievement>,
}

impl Default for AchievementStore {
    fn default() -> Self {
        Self {
            achievements: CATALOGUE.iter().map(Achievement::from).collect(),
        }
    }
}

impl AchievementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds catalogue entries missing from a restored store.
    pub fn merge_catalogue(&mut self) {
        for def in CATALOGUE {
            if !self.achievements.iter().any(|a| a.id == def.id) {
                self.achievements.push(Achievement::from(def));
            }
        }
    }

    pub fn all(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.is_unlocked())
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked().count()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: &str) -> Result<&Achievement, AchievementError> {
        self.achievements
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AchievementError::UnknownAchievement(id.to_string()))
    }

    /// Raises progress to `value` (never lowers it, capped at the maximum).
    /// Reaching the maximum unlocks the achievement; the unlocked copy is
    /// returned only from the call that unlocked it.
    pub fn update_progress(
        &mut self,
        id: &str,
        value: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<Achievement>, AchievementError> {
        let achievement = self
            .achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AchievementError::UnknownAchievement(id.to_string()))?;

        if achievement.is_unlocked() {
            return Ok(None);
        }

        achievement.progress = achievement.progress.max(value.min(achievement.max_progress));
        if achievement.progress >= achievement.max_progress {
            achievement.unlocked_at = Some(now);
            tracing::info!(achievement = %achievement.id, "achievement unlocked");
            return Ok(Some(achievement.clone()));
        }
        Ok(None)
    }
}
