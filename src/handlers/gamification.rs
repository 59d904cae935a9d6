// src/handlers/gamification.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use validator::Validate;

use crate::{
    error::AppError,
    handlers::persist,
    models::{analytics::SpendCreditsRequest, leaderboard::LeaderboardParams},
    state::AppState,
};

/// XP, level, title and daily streak.
pub async fn get_progress(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    Ok(Json(learner.progress.summary()))
}

/// Every achievement with its progress; locked ones included.
pub async fn list_achievements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    Ok(Json(learner.achievements.all().to_vec()))
}

/// Ranked standings, optionally for one class. The learner's row is
/// refreshed first so a lapsed streak stops counting.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.refresh_leaderboard(Utc::now().date_naive());
    let standings = learner
        .leaderboard
        .standings(params.class_id.as_deref(), params.limit);
    Ok(Json(standings))
}

pub async fn get_analytics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    Ok(Json(learner.analytics.summary()))
}

/// Records tutor credits spent; they add to the leaderboard score.
pub async fn spend_credits(
    State(state): State<AppState>,
    Json(req): Json<SpendCreditsRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let mut learner = state.learner.lock().await;
    let credits_used = learner.spend_credits(req.credits, Utc::now().date_naive());
    persist(&state, &learner).await;

    Ok(Json(json!({ "creditsUsed": credits_used })))
}

/// Marks a concept's lesson as read. Completing it twice is a no-op.
pub async fn complete_lesson(
    State(state): State<AppState>,
    Path(concept_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Unknown concepts are rejected before touching learner state.
    state.curriculum.concept(&concept_id)?;

    let mut learner = state.learner.lock().await;
    let newly_completed = learner.complete_lesson(&concept_id, Utc::now());
    if newly_completed {
        persist(&state, &learner).await;
    }

    Ok(Json(json!({
        "conceptId": concept_id,
        "newlyCompleted": newly_completed,
        "lessonsCompleted": learner.analytics.lessons_completed(),
    })))
}

/// Clears all learner state, in memory and in the local store.
pub async fn reset_learner(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.reset();
    persist(&state, &learner).await;
    Ok(StatusCode::NO_CONTENT)
}
