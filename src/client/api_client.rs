// file: src/client/api_client.rs
// description: HTTP client for the task REST API
// reference: https://docs.rs/reqwest

use crate::config::ClientConfig;
use crate::error::{Result, TodoError};
use crate::models::{Category, NewCategory, NewTask, TaskPage, TaskResponse, TaskUpdate};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct TaskApiClient {
    client: Client,
    base_url: String,
}

impl TaskApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TodoError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn get_tasks(&self, status: Option<&str>) -> Result<Vec<TaskResponse>> {
        let mut request = self.client.get(self.url("/tasks"));
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        self.send(request, "Error fetching tasks").await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<TaskResponse> {
        let request = self.client.post(self.url("/tasks")).json(task);
        self.send(request, "Error creating a task").await
    }

    pub async fn edit_task(&self, id: &str, update: &TaskUpdate) -> Result<TaskResponse> {
        let request = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(update);
        self.send(request, "Error editing task").await
    }

    pub async fn delete_task(&self, id: &str) -> Result<String> {
        let request = self.client.delete(self.url(&format!("/tasks/{}", id)));
        let body: Value = self.send(request, "Error deleting task").await?;
        Ok(body["message"]
            .as_str()
            .unwrap_or("Task deleted")
            .to_string())
    }

    pub async fn search_tasks_by_name(&self, name: &str) -> Result<Vec<TaskResponse>> {
        let request = self
            .client
            .get(self.url("/tasks/search-tasks-by-name"))
            .query(&[("name", name)]);
        self.send(request, "Error searching tasks").await
    }

    pub async fn tasks_by_date_range(&self, start: &str, end: &str) -> Result<Vec<TaskResponse>> {
        let request = self
            .client
            .get(self.url("/tasks/date-range"))
            .query(&[("startDate", start), ("endDate", end)]);
        self.send(request, "Error fetching tasks by date range").await
    }

    /// Without a `limit` the server applies its configured default.
    pub async fn tasks_page(&self, page: usize, limit: Option<usize>) -> Result<TaskPage> {
        let mut request = self
            .client
            .get(self.url("/tasks/pagination"))
            .query(&[("page", page)]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        self.send(request, "Error fetching tasks page").await
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let request = self.client.get(self.url("/categories"));
        self.send(request, "Error fetching categories").await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let body = NewCategory {
            category_name: Some(name.to_string()),
        };
        let request = self.client.post(self.url("/categories")).json(&body);
        self.send(request, "Error creating category").await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<T> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TodoError::Http(format!("{}: {}", context, e)))?;

        let status = response.status();
        debug!("{} -> {}", response.url(), status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TodoError::Http(format!(
                "{} ({}): {}",
                context,
                status,
                error_message(&body)
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TodoError::Http(format!("{}: invalid response body: {}", context, e)))
    }
}

/// Pulls the `message` out of an API error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
