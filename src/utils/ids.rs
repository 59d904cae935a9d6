// src/utils/ids.rs

use chrono::Utc;
use rand::Rng;

/// Builds a synthetic identifier from the current time and a random suffix,
/// e.g. `q_1718000000000_2375`.
pub fn synthetic_id<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        rng.gen_range(0..1_000_000u32)
    )
}
