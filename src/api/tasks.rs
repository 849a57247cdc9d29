// file: src/api/tasks.rs
// description: task route handlers

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::models::{DateRange, NewTask, PageRequest, TaskPage, TaskResponse, TaskStatus, TaskUpdate};
use crate::utils::parse_date;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let Query(query) = query?;
    let status = TaskStatus::parse_filter(query.status.as_deref())
        .map_err(|e| ApiError::bad_request("Invalid status filter", e))?;

    let tasks = state
        .tasks
        .list(status)
        .await
        .map_err(|e| ApiError::with_context("Couldn't get tasks from the db", e))?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(input) = payload?;
    let task = state
        .tasks
        .create(input)
        .await
        .map_err(|e| ApiError::with_context("Failed to create task", e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn edit_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Json(update) = payload?;
    let task = state
        .tasks
        .edit(&id, update)
        .await
        .map_err(|e| ApiError::with_context("Failed to edit task", e))?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .tasks
        .delete(&id)
        .await
        .map_err(|e| ApiError::with_context("Failed to delete task", e))?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

pub async fn search_tasks_by_name(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let Query(query) = query?;
    let tasks = state
        .tasks
        .search_by_name(query.name.as_deref())
        .await
        .map_err(|e| ApiError::with_context("Internal Server Error", e))?;
    Ok(Json(tasks))
}

pub async fn tasks_by_date_range(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let Query(query) = query?;

    let (Some(start), Some(end)) = (
        query.start_date.as_deref().filter(|s| !s.trim().is_empty()),
        query.end_date.as_deref().filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Start date and end date are required",
            "missing startDate or endDate",
        ));
    };

    let range = DateRange {
        start: parse_date(start).map_err(|e| ApiError::with_context("Invalid startDate", e))?,
        end: parse_date(end).map_err(|e| ApiError::with_context("Invalid endDate", e))?,
    };

    let tasks = state
        .tasks
        .by_date_range(range)
        .await
        .map_err(|e| ApiError::with_context("Internal Server Error", e))?;
    Ok(Json(tasks))
}

pub async fn tasks_with_pagination(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<TaskPage>, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.pagination,
    );

    let page = state
        .tasks
        .page(request)
        .await
        .map_err(|e| ApiError::with_context("Failed to fetch tasks", e))?;
    Ok(Json(page))
}
