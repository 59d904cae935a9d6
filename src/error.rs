// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::services::{
    achievements::AchievementError, curriculum::CurriculumError, practice::PracticeError,
    session::SessionError,
};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., a test is already running)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoActiveSession => AppError::NotFound(err.to_string()),
            SessionError::SessionAlreadyActive(_) => AppError::Conflict(err.to_string()),
            SessionError::EmptyTest
            | SessionError::OptionOutOfRange { .. }
            | SessionError::QuestionOutOfRange { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<CurriculumError> for AppError {
    fn from(err: CurriculumError) -> Self {
        match err {
            CurriculumError::Io(_) | CurriculumError::Parse(_) => {
                AppError::InternalServerError(err.to_string())
            }
            _ => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<AchievementError> for AppError {
    fn from(err: AchievementError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl From<PracticeError> for AppError {
    fn from(err: PracticeError) -> Self {
        match err {
            PracticeError::UnknownTest(_) => AppError::NotFound(err.to_string()),
            PracticeError::NoQuestions
            | PracticeError::AnswerCountMismatch { .. }
            | PracticeError::OptionOutOfRange { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}

