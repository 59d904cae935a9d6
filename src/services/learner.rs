// src/services/learner.rs

//! All per-learner state, owned by one explicit object instead of
//! module-level singletons. Created at startup (restored from the local
//! cache), cleared by `reset`.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    models::leaderboard::LearnerStats,
    services::{
        achievements::{AchievementStore, LESSON_LEARNER},
        analytics::AnalyticsStore,
        leaderboard::Leaderboard,
        persistence::{
            ACHIEVEMENTS_STORE, ANALYTICS_STORE, LEADERBOARD_STORE, NamedBlob, PRACTICE_STORE,
            PROGRESS_STORE, STORE_VERSION, StateStore, StoreError, TESTS_STORE, load_versioned,
        },
        practice::PracticeTestStore,
        progress::ProgressStore,
        session::TestStore,
    },
};

/// Leaderboard id of the local learner.
pub const LEARNER_USER_ID: &str = "me";

#[derive(Debug)]
pub struct LearnerState {
    name: String,
    pub tests: TestStore,
    pub practice: PracticeTestStore,
    pub progress: ProgressStore,
    pub achievements: AchievementStore,
    pub analytics: AnalyticsStore,
    pub leaderboard: Leaderboard,
}

impl LearnerState {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let leaderboard = Leaderboard::with_peers(LearnerStats {
            user_id: LEARNER_USER_ID.to_string(),
            name: name.clone(),
            ..Default::default()
        });

        Self {
            name,
            tests: TestStore::new(),
            practice: PracticeTestStore::new(),
            progress: ProgressStore::new(),
            achievements: AchievementStore::new(),
            analytics: AnalyticsStore::new(),
            leaderboard,
        }
    }

    /// Counters the leaderboard score is derived from, as of `today`.
    pub fn stats(&self, today: NaiveDate) -> LearnerStats {
        LearnerStats {
            user_id: LEARNER_USER_ID.to_string(),
            name: self.name.clone(),
            class_id: self.tests.history().next().map(|r| r.class_id.clone()),
            lessons_completed: self.analytics.lessons_completed() as u32,
            quizzes_passed: self.analytics.quizzes_passed(),
            credits_used: self.analytics.credits_used(),
            streak_days: self.progress.active_streak(today),
            badges: self.achievements.unlocked_count() as u32,
        }
    }

    /// Recomputes the learner's standing from current counters.
    pub fn refresh_leaderboard(&mut self, today: NaiveDate) -> Option<usize> {
        let stats = self.stats(today);
        self.leaderboard.update(stats)
    }

    /// Marks a lesson complete and pushes the lesson badge and leaderboard
    /// along. Returns `false` when the lesson was already done.
    pub fn complete_lesson(&mut self, concept_id: &str, now: DateTime<Utc>) -> bool {
        if !self.analytics.complete_lesson(concept_id) {
            return false;
        }
        self.progress.record_activity(now.date_naive());

        let lessons = self.analytics.lessons_completed() as u32;
        if let Err(e) = self.achievements.update_progress(LESSON_LEARNER, lessons, now) {
            tracing::warn!(error = %e, "lesson achievement update failed");
        }
        self.refresh_leaderboard(now.date_naive());
        true
    }

    /// Records tutor credits spent and moves the leaderboard with them.
    /// Returns the running total.
    pub fn spend_credits(&mut self, credits: u32, today: NaiveDate) -> u32 {
        self.analytics.spend_credits(credits);
        self.refresh_leaderboard(today);
        tracing::info!(credits, total = self.analytics.credits_used(), "credits spent");
        self.analytics.credits_used()
    }

    /// Forgets everything, as on logout.
    pub fn reset(&mut self) {
        tracing::info!("resetting learner state");
        *self = Self::new(self.name.clone());
    }

    /// Rebuilds state from the local cache; missing or stale stores start
    /// fresh.
    pub async fn restore(store: &dyn StateStore, name: &str) -> Result<Self, StoreError> {
        let mut learner = Self::new(name);

        if let Some(tests) = load_versioned(store, TESTS_STORE, STORE_VERSION).await? {
            learner.tests = tests;
        }
        if let Some(practice) = load_versioned(store, PRACTICE_STORE, STORE_VERSION).await? {
            learner.practice = practice;
        }
        if let Some(progress) = load_versioned(store, PROGRESS_STORE, STORE_VERSION).await? {
            learner.progress = progress;
        }
        if let Some(achievements) = load_versioned(store, ACHIEVEMENTS_STORE, STORE_VERSION).await? {
            learner.achievements = achievements;
            learner.achievements.merge_catalogue();
        }
        if let Some(analytics) = load_versioned(store, ANALYTICS_STORE, STORE_VERSION).await? {
            learner.analytics = analytics;
        }
        if let Some(leaderboard) = load_versioned(store, LEADERBOARD_STORE, STORE_VERSION).await? {
            learner.leaderboard = leaderboard;
        }
        learner.leaderboard.recompute();
        learner.refresh_leaderboard(Utc::now().date_naive());

        tracing::info!(
            results = learner.tests.history_len(),
            xp = learner.progress.total_xp(),
            "learner state restored"
        );
        Ok(learner)
    }

    /// Writes every store in one batch, so the cache never mixes old and
    /// new blobs.
    pub async fn persist(&self, store: &dyn StateStore) -> Result<(), StoreError> {
        let blobs = vec![
            NamedBlob::encode(TESTS_STORE, STORE_VERSION, &self.tests)?,
            NamedBlob::encode(PRACTICE_STORE, STORE_VERSION, &self.practice)?,
            NamedBlob::encode(PROGRESS_STORE, STORE_VERSION, &self.progress)?,
            NamedBlob::encode(ACHIEVEMENTS_STORE, STORE_VERSION, &self.achievements)?,
            NamedBlob::encode(ANALYTICS_STORE, STORE_VERSION, &self.analytics)?,
            NamedBlob::encode(LEADERBOARD_STORE, STORE_VERSION, &self.leaderboard)?,
        ];
        store.set_many(blobs).await
    }
}
