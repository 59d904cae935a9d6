// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::Mutex;

use crate::services::{
    curriculum::CurriculumIndex, learner::LearnerState, persistence::StateStore,
};

/// Shared state handed to every handler.
///
/// The learner lives behind one async mutex: a request that mutates the
/// learner holds the lock until its changes are persisted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub curriculum: Arc<CurriculumIndex>,
    pub learner: Arc<Mutex<LearnerState>>,
}

impl FromRef<AppState> for Arc<CurriculumIndex> {
    fn from_ref(state: &AppState) -> Self {
        state.curriculum.clone()
    }
}
