// file: src/database/task_repo.rs
// description: task persistence and queries over the LanceDB tasks table
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::database::filter;
use crate::database::records::{batch_to_tasks, tasks_to_batch};
use crate::database::schema::SchemaManager;
use crate::error::{Result, TodoError};
use crate::models::{DateRange, PageRequest, Task, TaskStatus};
use arrow_array::RecordBatchIterator;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Clone)]
pub struct TaskRepository {
    client: LanceDbClient,
}

impl TaskRepository {
    pub fn new(client: LanceDbClient) -> Self {
        Self { client }
    }

    fn table_name(&self) -> &str {
        self.client.tasks_table()
    }

    async fn fetch(&self, filter: Option<String>, limit: usize, offset: usize) -> Result<Vec<Task>> {
        let batches = self
            .client
            .query_batches(self.table_name(), filter.as_deref(), limit, offset)
            .await?;

        let mut tasks = Vec::new();
        for batch in &batches {
            tasks.extend(batch_to_tasks(batch)?);
        }
        Ok(tasks)
    }

    /// Fetches every matching row; the count bounds the scan limit.
    async fn fetch_all(&self, filter: Option<String>) -> Result<Vec<Task>> {
        let total = self.client.count_rows(self.table_name(), filter.clone()).await?;
        if total == 0 {
            return Ok(Vec::new());
        }
        self.fetch(filter, total, 0).await
    }

    pub async fn list(&self, status: Option<TaskStatus>, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let filter = status.map(|s| filter::status(s, now));
        self.fetch_all(filter).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Task>> {
        let mut tasks = self.fetch(Some(filter::id_equals(id)), 1, 0).await?;
        Ok(tasks.pop())
    }

    pub async fn count(&self) -> Result<usize> {
        self.client.count_rows(self.table_name(), None).await
    }

    pub async fn insert(&self, task: &Task) -> Result<()> {
        let schema = SchemaManager::tasks_schema();
        let batch = tasks_to_batch(std::slice::from_ref(task))?;

        let table = self.client.get_table(self.table_name()).await?;
        table
            .add(RecordBatchIterator::new(vec![Ok(batch)], schema))
            .execute()
            .await
            .map_err(|e| TodoError::Database(format!("Failed to insert task: {}", e)))?;

        debug!("Inserted task: {}", task.id);
        Ok(())
    }

    /// Overwrites the stored row with the same id in a single commit.
    /// Returns false when no such row exists; nothing is inserted then.
    pub async fn replace(&self, task: &Task) -> Result<bool> {
        let schema = SchemaManager::tasks_schema();
        let batch = tasks_to_batch(std::slice::from_ref(task))?;

        let table = self.client.get_table(self.table_name()).await?;
        let mut merge = table.merge_insert(&["id"]);
        merge.when_matched_update_all(None);

        let result = merge
            .execute(Box::new(RecordBatchIterator::new(vec![Ok(batch)], schema)))
            .await
            .map_err(|e| TodoError::Database(format!("Failed to replace task {}: {}", task.id, e)))?;

        debug!("Replaced task {} ({} rows)", task.id, result.num_updated_rows);
        Ok(result.num_updated_rows > 0)
    }

    /// Returns false when no task had this id.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let predicate = filter::id_equals(id);
        if self
            .client
            .count_rows(self.table_name(), Some(predicate.clone()))
            .await?
            == 0
        {
            return Ok(false);
        }

        let table = self.client.get_table(self.table_name()).await?;
        table
            .delete(&predicate)
            .await
            .map_err(|e| TodoError::Database(format!("Failed to delete task {}: {}", id, e)))?;

        info!("Deleted task: {}", id);
        Ok(true)
    }

    pub async fn search_by_name(&self, term: &str) -> Result<Vec<Task>> {
        self.fetch_all(Some(filter::name_contains(term))).await
    }

    pub async fn by_date_range(&self, range: &DateRange) -> Result<Vec<Task>> {
        self.fetch_all(Some(filter::date_range(range))).await
    }

    /// One page of tasks plus the total task count.
    pub async fn page(&self, request: PageRequest) -> Result<(Vec<Task>, usize)> {
        let total = self.count().await?;
        if request.offset() >= total {
            return Ok((Vec::new(), total));
        }

        let tasks = self.fetch(None, request.limit, request.offset()).await?;
        Ok((tasks, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::now_millis;
    use chrono::Duration;
    use std::collections::HashSet;
    use tempfile::TempDir;
    use uuid::Uuid;

    async fn setup() -> (TempDir, TaskRepository) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default_config().database;
        config.uri = dir.path().display().to_string();

        let client = LanceDbClient::new(config).await.unwrap();
        SchemaManager::new(&client).initialize().await.unwrap();
        (dir, TaskRepository::new(client))
    }

    fn task(name: &str) -> Task {
        let now = now_millis();
        Task {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            content: format!("{} details", name),
            start_date: None,
            end_date: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_get_replace_delete() {
        let (_dir, repo) = setup().await;
        let mut stored = task("Buy milk");

        repo.insert(&stored).await.unwrap();
        assert_eq!(repo.get(&stored.id).await.unwrap(), Some(stored.clone()));

        stored.name = "Buy oat milk".to_string();
        assert!(repo.replace(&stored).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.get(&stored.id).await.unwrap().unwrap().name, "Buy oat milk");

        assert!(repo.delete(&stored.id).await.unwrap());
        assert!(!repo.delete(&stored.id).await.unwrap());
        assert_eq!(repo.get(&stored.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_missing_row_inserts_nothing() {
        let (_dir, repo) = setup().await;
        repo.insert(&task("kept")).await.unwrap();

        assert!(!repo.replace(&task("ghost")).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let (_dir, repo) = setup().await;
        for name in ["Buy MILK", "milkshake recipe", "Walk the dog"] {
            repo.insert(&task(name)).await.unwrap();
        }

        let mut names: Vec<String> = repo
            .search_by_name("Milk")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Buy MILK", "milkshake recipe"]);

        assert!(repo.search_by_name("cat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let (_dir, repo) = setup().await;
        for name in ["50% off", "500 off", "a_b", "axb", "Clean C:\\temp", "c-drive"] {
            repo.insert(&task(name)).await.unwrap();
        }

        let names = |tasks: Vec<Task>| {
            let mut names: Vec<String> = tasks.into_iter().map(|t| t.name).collect();
            names.sort();
            names
        };

        assert_eq!(names(repo.search_by_name("50%").await.unwrap()), vec!["50% off"]);
        assert_eq!(names(repo.search_by_name("a_b").await.unwrap()), vec!["a_b"]);
        assert_eq!(
            names(repo.search_by_name("c:\\").await.unwrap()),
            vec!["Clean C:\\temp"]
        );
        assert_eq!(names(repo.search_by_name("O'").await.unwrap()), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_date_range_and_status_filters() {
        let (_dir, repo) = setup().await;
        let now = now_millis();

        let mut past = task("past");
        past.start_date = Some(now - Duration::days(10));
        past.end_date = Some(now - Duration::days(5));

        let mut current = task("current");
        current.start_date = Some(now - Duration::days(1));
        current.end_date = Some(now + Duration::days(1));

        let mut future = task("future");
        future.start_date = Some(now + Duration::days(3));

        let undated = task("undated");

        for t in [&past, &current, &future, &undated] {
            repo.insert(t).await.unwrap();
        }

        let range = DateRange {
            start: now - Duration::days(11),
            end: now,
        };
        let in_range = repo.by_date_range(&range).await.unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].name, "past");

        let done = repo.list(Some(TaskStatus::Done), now).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].name, "past");

        let new = repo.list(Some(TaskStatus::New), now).await.unwrap();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].name, "future");

        let in_progress = repo.list(Some(TaskStatus::InProgress), now).await.unwrap();
        assert_eq!(in_progress.len(), 2);
        for t in &in_progress {
            assert_eq!(t.status_at(now), TaskStatus::InProgress);
        }

        assert_eq!(repo.list(None, now).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_pages_partition_all_tasks() {
        let (_dir, repo) = setup().await;
        for i in 0..7 {
            repo.insert(&task(&format!("task {}", i))).await.unwrap();
        }

        let mut seen = HashSet::new();
        for page in 1..=3 {
            let (tasks, total) = repo.page(PageRequest { page, limit: 3 }).await.unwrap();
            assert_eq!(total, 7);
            assert_eq!(tasks.len(), if page == 3 { 1 } else { 3 });
            for t in tasks {
                assert!(seen.insert(t.id));
            }
        }
        assert_eq!(seen.len(), 7);

        let (tasks, total) = repo.page(PageRequest { page: 4, limit: 3 }).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(total, 7);
    }
}
