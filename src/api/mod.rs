// file: src/api/mod.rs
// description: REST API router, shared state and server bootstrap
// reference: https://docs.rs/axum

pub mod categories;
pub mod error;
pub mod tasks;

use crate::config::{Config, PaginationConfig, ServerConfig};
use crate::database::{CategoryRepository, LanceDbClient, SchemaManager, TaskRepository};
use crate::error::{Result, TodoError};
use crate::service::{CategoryService, TaskService};
use crate::utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer};
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub categories: CategoryService,
    pub client: LanceDbClient,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(client: LanceDbClient, pagination: PaginationConfig) -> Self {
        let categories = CategoryService::new(CategoryRepository::new(client.clone()));
        let tasks = TaskService::new(TaskRepository::new(client.clone()), categories.clone());

        Self {
            tasks,
            categories,
            client,
            pagination,
        }
    }

    /// Connects with retry and makes sure both tables exist.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = LanceDbClient::connect_with_retry(config.database.clone()).await?;
        SchemaManager::new(&client).initialize().await?;
        Ok(Self::new(client, config.pagination.clone()))
    }
}

pub fn router(state: AppState, server: &ServerConfig) -> Result<Router> {
    let origin = HeaderValue::from_str(&server.cors_origin).map_err(|e| {
        TodoError::Config(format!("Invalid cors_origin {}: {}", server.cors_origin, e))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Ok(Router::new()
        .route("/", get(hello))
        .route("/health", get(health))
        .route(
            "/api/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/tasks/search-tasks-by-name",
            get(tasks::search_tasks_by_name),
        )
        .route("/api/tasks/date-range", get(tasks::tasks_by_date_range))
        .route("/api/tasks/pagination", get(tasks::tasks_with_pagination))
        .route(
            "/api/tasks/{id}",
            put(tasks::edit_task).delete(tasks::delete_task),
        )
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/api/new-category", post(categories::create_category))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

pub async fn serve(config: &Config) -> Result<()> {
    let timer = OperationTimer::new("server startup");

    let state = AppState::connect(config).await?;
    let app = router(state, &config.server)?;

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    timer.finish();

    info!("Task API listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the WhatToDo API" }))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();
    let database = HealthCheck::from_outcome(
        "database",
        started,
        state.client.ping().await,
        HealthStatus::Unhealthy,
        |_| None,
    );

    let started = Instant::now();
    let tasks = HealthCheck::from_outcome(
        "tasks",
        started,
        state.tasks.count().await,
        HealthStatus::Degraded,
        |count| Some(format!("{} tasks stored", count)),
    );

    let report = HealthReport::new(vec![database, tasks], env!("CARGO_PKG_VERSION").to_string());
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn setup() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default_config();
        config.database.uri = dir.path().display().to_string();
        config.pagination.default_limit = 2;

        let state = AppState::connect(&config).await.unwrap();
        let app = router(state, &config.server).unwrap();
        (dir, app)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_hello_and_health() {
        let (_dir, app) = setup().await;

        let (status, body) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("WhatToDo"));

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallStatus"], "Healthy");
    }

    #[tokio::test]
    async fn test_task_crud_round() {
        let (_dir, app) = setup().await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({
                "name": "Plan trip",
                "content": "Book flights",
                "startDate": "2000-01-01",
                "endDate": "2000-01-02",
                "category": "Travel"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Done");
        assert_eq!(created["category"]["categoryName"], "Travel");
        let id = created["_id"].as_str().unwrap().to_string();

        let (status, listed) = send(&app, "GET", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["_id"], id.as_str());

        let (status, edited) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{}", id),
            Some(json!({ "content": "Book flights and hotel", "endDate": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["content"], "Book flights and hotel");
        assert_eq!(edited["status"], "In-Progress");

        let (status, _) = send(&app, "GET", "/api/tasks?status=Done", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "DELETE", &format!("/api/tasks/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Task deleted successfully");

        let (status, body) = send(&app, "DELETE", &format!("/api/tasks/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Task not found");

        let (_, categories) = send(&app, "GET", "/api/categories", None).await;
        assert_eq!(categories[0]["categoryName"], "Travel");
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let (_dir, app) = setup().await;

        let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({ "name": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "content is required");

        let (status, _) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "name": "x", "content": "y", "startDate": "tomorrow" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/tasks?status=Someday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_endpoints() {
        let (_dir, app) = setup().await;
        for (name, start, end) in [
            ("Buy Milk", "2024-01-05", "2024-01-06"),
            ("milk the cow", "2024-02-01", "2024-03-01"),
            ("Call mom", "2023-12-01", "2024-01-10"),
        ] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/tasks",
                Some(json!({ "name": name, "content": "-", "startDate": start, "endDate": end })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, found) =
            send(&app, "GET", "/api/tasks/search-tasks-by-name?name=MILK", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 2);

        let (status, body) = send(&app, "GET", "/api/tasks/search-tasks-by-name", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Name query parameter is required and must be a string"
        );

        let (status, ranged) = send(
            &app,
            "GET",
            "/api/tasks/date-range?startDate=2024-01-01&endDate=2024-01-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ranged.as_array().unwrap().len(), 1);
        assert_eq!(ranged[0]["name"], "Buy Milk");

        let (status, _) = send(&app, "GET", "/api/tasks/date-range?startDate=2024-01-01", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, page) = send(&app, "GET", "/api/tasks/pagination?page=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["tasks"].as_array().unwrap().len(), 1);
        assert_eq!(
            page["pagination"],
            json!({ "currentPage": 2, "totalPages": 2, "totalCount": 3, "limit": 2 })
        );
    }

    #[tokio::test]
    async fn test_category_endpoints() {
        let (_dir, app) = setup().await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({ "categoryName": "Errands" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["categoryName"], "Errands");

        let (status, _) = send(
            &app,
            "POST",
            "/api/new-category",
            Some(json!({ "categoryName": "Errands" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, "POST", "/api/categories", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = send(&app, "GET", "/api/categories", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }
}
