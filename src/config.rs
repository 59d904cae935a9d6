// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

use crate::error::AppError;

/// Lower bound of questions in a quick (single topic) test.
pub const QUICK_TEST_MIN_QUESTIONS: usize = 3;
/// Upper bound of questions in a quick (single topic) test.
pub const QUICK_TEST_MAX_QUESTIONS: usize = 5;
/// Chapter tests stop emitting questions at this count.
pub const CHAPTER_TEST_MAX_QUESTIONS: usize = 15;
/// Chapter tests are backfilled up to this count.
pub const CHAPTER_TEST_MIN_QUESTIONS: usize = 10;
/// Share of generated questions that are multiple choice.
pub const MULTIPLE_CHOICE_RATIO: f64 = 0.7;

/// A quiz counts as passed at or above this score.
pub const PASSING_SCORE_PERCENTAGE: u32 = 60;
/// Marks deducted per wrong answer in negatively marked practice tests.
pub const NEGATIVE_MARKING_PENALTY: f64 = 0.25;
/// Tests finished faster than this unlock the speed runner badge.
pub const SPEED_RUN_THRESHOLD_MS: i64 = 2 * 60 * 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub curriculum_path: String,
    pub learner_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://learnsmart.db?mode=rwc".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::InternalServerError(format!("Invalid BIND_ADDR: {}", e)))?;

        let curriculum_path =
            env::var("CURRICULUM_PATH").unwrap_or_else(|_| "data/curriculum.json".to_string());

        let learner_name = env::var("LEARNER_NAME").unwrap_or_else(|_| "You".to_string());

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            curriculum_path,
            learner_name,
        })
    }
}
