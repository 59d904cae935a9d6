// src/handlers/curriculum.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{error::AppError, models::curriculum::SearchParams, services::curriculum::CurriculumIndex};

/// Lists classes for the class picker.
pub async fn list_classes(
    State(curriculum): State<Arc<CurriculumIndex>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(curriculum.classes()))
}

/// Returns one class with its whole subject/chapter/topic/concept tree.
pub async fn get_class(
    State(curriculum): State<Arc<CurriculumIndex>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let class = curriculum.class(&id)?;
    Ok(Json(class.clone()))
}

/// Case-insensitive search over every text field of the curriculum.
/// A missing or blank `q` yields an empty list.
pub async fn search(
    State(curriculum): State<Arc<CurriculumIndex>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.q.unwrap_or_default();
    Ok(Json(curriculum.search_content(&query)))
}
