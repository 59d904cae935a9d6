// src/services/mod.rs

pub mod achievements;
pub mod analytics;
pub mod curriculum;
pub mod gamification;
pub mod generator;
pub mod leaderboard;
pub mod learner;
pub mod persistence;
pub mod practice;
pub mod progress;
pub mod scoring;
pub mod session;
