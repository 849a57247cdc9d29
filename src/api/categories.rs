// file: src/api/categories.rs
// description: category route handlers

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::models::{Category, NewCategory};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(|e| ApiError::with_context("Error fetching categories", e))?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(input) = payload?;
    let category = state
        .categories
        .create(input)
        .await
        .map_err(|e| ApiError::with_context("Error creating category", e))?;
    Ok((StatusCode::CREATED, Json(category)))
}
