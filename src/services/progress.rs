// src/services/progress.rs

//! XP ledger, levels and the daily activity streak.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::progress::{ProgressSummary, StreakState, XpEvent, XpItem};

/// XP required to reach each level.
const LEVEL_XP: [u64; 10] = [
    0,     // Level 1
    500,   // Level 2
    1200,  // Level 3
    2000,  // Level 4
    3000,  // Level 5
    4500,  // Level 6
    6500,  // Level 7
    9000,  // Level 8
    12000, // Level 9
    16000, // Level 10
];

const RECENT_XP_EVENTS: usize = 20;

/// Calculate level from total XP.
#[must_use]
pub fn level_from_xp(xp: u64) -> u32 {
    LEVEL_XP
        .iter()
        .rposition(|&required| xp >= required)
        .map(|idx| idx as u32 + 1)
        .unwrap_or(1)
}

/// Title earned at each level.
#[must_use]
pub fn level_title(level: u32) -> &'static str {
    match level {
        1 => "Curious Beginner",
        2 => "Eager Learner",
        3 => "Steady Student",
        4 => "Quiz Taker",
        5 => "Concept Collector",
        6 => "Chapter Champion",
        7 => "Subject Specialist",
        8 => "Knowledge Seeker",
        9 => "Scholar",
        10 => "LearnSmart Master",
        _ => "Unknown",
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStore {
    total_xp: u64,
    ledger: Vec<XpEvent>,
    streak: StreakState,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    pub fn level(&self) -> u32 {
        level_from_xp(self.total_xp)
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    /// Streak length as of `today`. A streak whose last active day is
    /// before yesterday is already broken and counts as 0.
    pub fn active_streak(&self, today: NaiveDate) -> u32 {
        match self.streak.last_active {
            Some(last) if last >= today || last.succ_opt() == Some(today) => self.streak.current,
            _ => 0,
        }
    }

    /// Applies a batch of XP items in order. Returns the XP added.
    pub fn add_xp_batch(&mut self, items: Vec<XpItem>, now: DateTime<Utc>) -> u64 {
        let level_before = self.level();
        let added: u64 = items.iter().map(|i| u64::from(i.amount)).sum();

        self.total_xp = self.total_xp.saturating_add(added);
        self.ledger
            .extend(items.into_iter().map(|item| XpEvent { item, awarded_at: now }));

        let level_after = self.level();
        if level_after > level_before {
            tracing::info!(level = level_after, title = level_title(level_after), "level up");
        }
        added
    }

    /// Counts today towards the daily streak. Repeated calls on the same
    /// day change nothing; a missed day restarts the streak at 1.
    pub fn record_activity(&mut self, today: NaiveDate) -> &StreakState {
        let streak = &mut self.streak;
        match streak.last_active {
            // same day, or the clock went backwards
            Some(last) if today <= last => {}
            Some(last) if last.succ_opt() == Some(today) => {
                streak.current += 1;
                streak.last_active = Some(today);
            }
            _ => {
                streak.current = 1;
                streak.last_active = Some(today);
            }
        }
        streak.longest = streak.longest.max(streak.current);
        &self.streak
    }

    pub fn summary(&self) -> ProgressSummary {
        let level = self.level();
        let idx = (level as usize).saturating_sub(1);
        let current_level_xp = LEVEL_XP.get(idx).copied().unwrap_or(0);
        let next_level_xp = LEVEL_XP.get(idx + 1).copied().unwrap_or(current_level_xp);

        ProgressSummary {
            total_xp: self.total_xp,
            level,
            title: level_title(level),
            xp_in_level: self.total_xp.saturating_sub(current_level_xp),
            xp_for_level: next_level_xp.saturating_sub(current_level_xp),
            streak: self.streak.clone(),
            recent_xp: self
                .ledger
                .iter()
                .rev()
                .take(RECENT_XP_EVENTS)
                .cloned()
                .collect(),
        }
    }
}
