// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::persist,
    models::{
        question::{PublicQuestion, Question},
        test_record::{
            AnswerRequest, GoToRequest, SessionView, StartChapterTestRequest,
            StartQuickTestRequest, TestConfig, TestType,
        },
    },
    services::{gamification::apply_gamification, generator::QuestionGenerator},
    state::AppState,
    utils::ids::synthetic_id,
};

/// Starts a 3-5 question test over a single topic.
pub async fn start_quick_test(
    State(state): State<AppState>,
    Json(req): Json<StartQuickTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let (test_id, questions) = {
        let mut rng = rand::thread_rng();
        let questions = QuestionGenerator::new(&state.curriculum).quick_test(
            &mut rng,
            &req.class_id,
            &req.subject_id,
            &req.chapter_id,
            &req.topic_id,
        )?;
        (synthetic_id("test", &mut rng), questions)
    };

    let config = TestConfig {
        test_type: TestType::Quick,
        class_id: req.class_id,
        subject_id: req.subject_id,
        chapter_id: Some(req.chapter_id),
        topic_id: Some(req.topic_id),
    };

    start(state, test_id, config, questions).await
}

/// Starts a 10-15 question test spanning a whole chapter.
pub async fn start_chapter_test(
    State(state): State<AppState>,
    Json(req): Json<StartChapterTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let (test_id, questions) = {
        let mut rng = rand::thread_rng();
        let questions = QuestionGenerator::new(&state.curriculum).chapter_test(
            &mut rng,
            &req.class_id,
            &req.subject_id,
            &req.chapter_id,
        )?;
        (synthetic_id("test", &mut rng), questions)
    };

    let config = TestConfig {
        test_type: TestType::Chapter,
        class_id: req.class_id,
        subject_id: req.subject_id,
        chapter_id: Some(req.chapter_id),
        topic_id: None,
    };

    start(state, test_id, config, questions).await
}

async fn start(
    state: AppState,
    test_id: String,
    config: TestConfig,
    questions: Vec<Question>,
) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    let view = SessionView::from(learner.tests.start_test(test_id, config, questions, Utc::now())?);

    Ok((StatusCode::CREATED, Json(view)))
}

/// Shows the running test with answer keys hidden.
pub async fn current_test(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    Ok(Json(SessionView::from(learner.tests.session()?)))
}

/// Records an answer for the current question (re-answering overwrites).
pub async fn answer_question(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.tests.answer_question(req.option)?;
    Ok(Json(SessionView::from(learner.tests.session()?)))
}

pub async fn next_question(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.tests.next_question()?;
    Ok(Json(PublicQuestion::from(learner.tests.current_question()?)))
}

pub async fn previous_question(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.tests.previous_question()?;
    Ok(Json(PublicQuestion::from(learner.tests.current_question()?)))
}

pub async fn go_to_question(
    State(state): State<AppState>,
    Json(req): Json<GoToRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.tests.go_to_question(req.index)?;
    Ok(Json(PublicQuestion::from(learner.tests.current_question()?)))
}

/// Scores the running test, appends it to history and runs the
/// gamification fan-out.
///
/// * 404 when no test is running (including a second submit).
/// * Gamification and cache-write failures never fail the submit; `saved`
///   tells the client whether the result reached the local store.
pub async fn submit_test(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let mut learner = state.learner.lock().await;

    let result = learner.tests.submit_test(now)?;
    let outcome = apply_gamification(&mut learner, &result, now);

    let saved = persist(&state, &learner).await;

    Ok(Json(json!({
        "result": result,
        "gamification": outcome,
        "saved": saved,
    })))
}

/// Drops the running test without scoring it.
pub async fn cancel_test(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut learner = state.learner.lock().await;
    learner.tests.cancel_test()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Completed results, newest first.
pub async fn list_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    let history: Vec<_> = learner.tests.history().cloned().collect();
    Ok(Json(history))
}

pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let learner = state.learner.lock().await;
    let result = learner
        .tests
        .result(&id)
        .cloned()
        .ok_or(AppError::NotFound("Test result not found".to_string()))?;
    Ok(Json(result))
}
