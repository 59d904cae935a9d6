// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{curriculum, gamification, practice, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (curriculum, tests, practice tests, gamification).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, curriculum, learner).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let curriculum_routes = Router::new()
        .route("/classes", get(curriculum::list_classes))
        .route("/classes/{id}", get(curriculum::get_class))
        .route("/search", get(curriculum::search));

    let test_routes = Router::new()
        .route("/quick", post(quiz::start_quick_test))
        .route("/chapter", post(quiz::start_chapter_test))
        .route("/current", get(quiz::current_test))
        .route("/current/answer", post(quiz::answer_question))
        .route("/current/next", post(quiz::next_question))
        .route("/current/previous", post(quiz::previous_question))
        .route("/current/goto", post(quiz::go_to_question))
        .route("/current/submit", post(quiz::submit_test))
        .route("/current/cancel", post(quiz::cancel_test))
        .route("/history", get(quiz::list_history))
        .route("/history/{id}", get(quiz::get_result));

    let practice_routes = Router::new()
        .route(
            "/",
            get(practice::list_practice_tests).post(practice::create_practice_test),
        )
        .route("/stats", get(practice::practice_stats))
        .route("/{id}/submit", post(practice::submit_practice_test));

    let learner_routes = Router::new()
        .route("/progress", get(gamification::get_progress))
        .route("/achievements", get(gamification::list_achievements))
        .route("/leaderboard", get(gamification::get_leaderboard))
        .route("/analytics", get(gamification::get_analytics))
        .route("/credits/spend", post(gamification::spend_credits))
        .route(
            "/lessons/{concept_id}/complete",
            post(gamification::complete_lesson),
        )
        .route("/learner/reset", post(gamification::reset_learner));

    Router::new()
        .nest("/api/curriculum", curriculum_routes)
        .nest("/api/tests", test_routes)
        .nest("/api/practice-tests", practice_routes)
        .nest("/api", learner_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
