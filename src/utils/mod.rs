// src/utils/mod.rs

pub mod ids;
pub mod text;
