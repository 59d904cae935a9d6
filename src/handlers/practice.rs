// src/handlers/practice.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::persist,
    models::practice::{CreatePracticeTestRequest, PublicPracticeTest, SubmitPracticeRequest},
    services::{
        generator::QuestionGenerator,
        practice::{DEFAULT_DURATION_MINUTES, DEFAULT_MARKS_PER_QUESTION, PracticeDraft},
    },
    state::AppState,
    utils::ids::synthetic_id,
};

/// Lists saved practice papers (answer keys hidden).
pub async fn list_practice_tests(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    let tests: Vec<PublicPracticeTest> = learner
        .practice
        .tests()
        .iter()
        .map(PublicPracticeTest::from)
        .collect();
    Ok(Json(tests))
}

/// Generates a practice paper from a chapter and saves it.
pub async fn create_practice_test(
    State(state): State<AppState>,
    Json(req): Json<CreatePracticeTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let (id, questions) = {
        let mut rng = rand::thread_rng();
        let questions = QuestionGenerator::new(&state.curriculum).chapter_test(
            &mut rng,
            &req.class_id,
            &req.subject_id,
            &req.chapter_id,
        )?;
        (synthetic_id("practice", &mut rng), questions)
    };

    let draft = PracticeDraft {
        title: req.title,
        class_id: req.class_id,
        subject_id: req.subject_id,
        chapter_id: req.chapter_id,
        duration_minutes: req.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
        marks_per_question: req.marks_per_question.unwrap_or(DEFAULT_MARKS_PER_QUESTION),
        negative_marking: req.negative_marking,
    };

    let mut learner = state.learner.lock().await;
    let test = PublicPracticeTest::from(learner.practice.create_test(id, draft, questions, Utc::now())?);
    persist(&state, &learner).await;

    Ok((StatusCode::CREATED, Json(test)))
}

/// Scores an attempt. `answers` must line up with the paper's questions.
pub async fn submit_practice_test(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitPracticeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.time_taken < 0 {
        return Err(AppError::BadRequest("timeTaken cannot be negative".to_string()));
    }

    let mut learner = state.learner.lock().await;
    let result = learner
        .practice
        .submit_attempt(&id, &req.answers, req.time_taken, Utc::now())?;
    persist(&state, &learner).await;

    Ok(Json(result))
}

pub async fn practice_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    Ok(Json(learner.practice.stats()))
}
