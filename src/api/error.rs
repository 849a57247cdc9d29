// file: src/api/error.rs
// description: mapping of domain errors onto HTTP responses

use crate::error::TodoError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Rendered as `{ "message": ..., "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: String,
}

impl ApiError {
    /// `context` becomes the message for server-side failures; client errors
    /// keep their own message.
    pub fn with_context(context: &str, err: TodoError) -> Self {
        let detail = err.to_string();

        match err {
            TodoError::Validation(msg) => Self {
                status: StatusCode::BAD_REQUEST,
                message: msg,
                detail,
            },
            TodoError::NotFound { entity, .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: format!("{} not found", entity),
                detail,
            },
            TodoError::Conflict(msg) => Self {
                status: StatusCode::CONFLICT,
                message: msg,
                detail,
            },
            _ => {
                error!("{}: {}", context, detail);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: context.to_string(),
                    detail,
                }
            }
        }
    }

    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query string", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
            "error": self.detail,
        }));
        (self.status, body).into_response()
    }
}
