// src/models/mod.rs

pub mod achievement;
pub mod analytics;
pub mod curriculum;
pub mod leaderboard;
pub mod practice;
pub mod progress;
pub mod question;
pub mod test_record;
