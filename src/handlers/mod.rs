// src/handlers/mod.rs

pub mod curriculum;
pub mod gamification;
pub mod practice;
pub mod quiz;

use crate::{services::learner::LearnerState, state::AppState};

/// Writes every learner store back to the local cache.
///
/// The in-memory change has already happened by the time this runs, so a
/// failed write is logged and reported as `false` instead of failing the
/// request; the next successful write catches the cache up.
pub(crate) async fn persist(state: &AppState, learner: &LearnerState) -> bool {
    match learner.persist(state.store.as_ref()).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to persist learner state: {:?}", e);
            false
        }
    }
}
