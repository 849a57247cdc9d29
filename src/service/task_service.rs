// file: src/service/task_service.rs
// description: task creation, editing and queries with category resolution

use crate::database::TaskRepository;
use crate::error::{Result, TodoError};
use crate::models::{
    CategoryRef, DateRange, NewTask, PageRequest, Pagination, Task, TaskPage, TaskResponse,
    TaskStatus, TaskUpdate, now_millis,
};
use crate::service::CategoryService;
use crate::utils::Validator;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskService {
    tasks: TaskRepository,
    categories: CategoryService,
    // Serializes read-modify-write edits so concurrent updates do not interleave.
    edits: Arc<Mutex<()>>,
}

impl TaskService {
    pub fn new(tasks: TaskRepository, categories: CategoryService) -> Self {
        Self {
            tasks,
            categories,
            edits: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self, status: Option<TaskStatus>) -> Result<Vec<TaskResponse>> {
        let now = now_millis();
        let tasks = self.tasks.list(status, now).await?;
        Ok(respond(tasks, now))
    }

    pub async fn get(&self, id: &str) -> Result<TaskResponse> {
        let id = Validator::parse_id("task", id)?;
        self.tasks
            .get(&id)
            .await?
            .map(|task| task.into_response(now_millis()))
            .ok_or_else(|| TodoError::task_not_found(id))
    }

    pub async fn create(&self, input: NewTask) -> Result<TaskResponse> {
        let name = Validator::require_text("name", input.name.as_deref())?;
        let content = Validator::require_text("content", input.content.as_deref())?;
        let category = self.resolve_category(input.category.as_deref()).await?;

        let now = now_millis();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            name,
            content,
            start_date: input.start_date,
            end_date: input.end_date,
            category,
            created_at: now,
            updated_at: now,
        };

        self.tasks.insert(&task).await?;
        info!("Created task {} ({})", task.id, task.name);
        Ok(task.into_response(now))
    }

    pub async fn edit(&self, id: &str, update: TaskUpdate) -> Result<TaskResponse> {
        let id = Validator::parse_id("task", id)?;
        let _guard = self.edits.lock().await;

        let mut task = self
            .tasks
            .get(&id)
            .await?
            .ok_or_else(|| TodoError::task_not_found(&id))?;

        if let Some(name) = update.name.as_deref() {
            task.name = Validator::require_text("name", Some(name))?;
        }
        if let Some(content) = update.content.as_deref() {
            task.content = Validator::require_text("content", Some(content))?;
        }
        if let Some(start_date) = update.start_date {
            task.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            task.end_date = end_date;
        }
        if let Some(category) = update.category {
            task.category = self.resolve_category(category.as_deref()).await?;
        }

        let now = now_millis();
        task.updated_at = now;

        if !self.tasks.replace(&task).await? {
            return Err(TodoError::task_not_found(id));
        }
        info!("Updated task {}", task.id);
        Ok(task.into_response(now))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = Validator::parse_id("task", id)?;
        if self.tasks.delete(&id).await? {
            Ok(())
        } else {
            Err(TodoError::task_not_found(id))
        }
    }

    pub async fn search_by_name(&self, name: Option<&str>) -> Result<Vec<TaskResponse>> {
        let term = match name.map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => {
                return Err(TodoError::Validation(
                    "Name query parameter is required and must be a string".to_string(),
                ));
            }
        };

        let tasks = self.tasks.search_by_name(term).await?;
        Ok(respond(tasks, now_millis()))
    }

    pub async fn by_date_range(&self, range: DateRange) -> Result<Vec<TaskResponse>> {
        let tasks = self.tasks.by_date_range(&range).await?;
        Ok(respond(tasks, now_millis()))
    }

    pub async fn page(&self, request: PageRequest) -> Result<TaskPage> {
        let (tasks, total) = self.tasks.page(request).await?;
        Ok(TaskPage {
            tasks: respond(tasks, now_millis()),
            pagination: Pagination::new(request, total),
        })
    }

    pub async fn count(&self) -> Result<usize> {
        self.tasks.count().await
    }

    async fn resolve_category(&self, name: Option<&str>) -> Result<Option<CategoryRef>> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => {
                Ok(Some(self.categories.ensure(name).await?.to_ref()))
            }
            _ => Ok(None),
        }
    }
}

fn respond(tasks: Vec<Task>, now: chrono::DateTime<chrono::Utc>) -> Vec<TaskResponse> {
    tasks
        .into_iter()
        .map(|task| task.into_response(now))
        .collect()
}
