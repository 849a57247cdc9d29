// file: src/database/records.rs
// description: conversions between models and Arrow record batches
// reference: https://docs.rs/arrow-array

use crate::database::schema::SchemaManager;
use crate::error::{Result, TodoError};
use crate::models::{Category, CategoryRef, Task};
use arrow_array::{Array, Int64Array, RecordBatch, StringArray};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub fn tasks_to_batch(tasks: &[Task]) -> Result<RecordBatch> {
    let ids: StringArray = tasks.iter().map(|t| Some(t.id.as_str())).collect();
    let names: StringArray = tasks.iter().map(|t| Some(t.name.as_str())).collect();
    let contents: StringArray = tasks.iter().map(|t| Some(t.content.as_str())).collect();
    let start_dates: Int64Array = tasks
        .iter()
        .map(|t| t.start_date.map(|d| d.timestamp_millis()))
        .collect();
    let end_dates: Int64Array = tasks
        .iter()
        .map(|t| t.end_date.map(|d| d.timestamp_millis()))
        .collect();
    let category_ids: StringArray = tasks
        .iter()
        .map(|t| t.category.as_ref().map(|c| c.id.as_str()))
        .collect();
    let category_names: StringArray = tasks
        .iter()
        .map(|t| t.category.as_ref().map(|c| c.category_name.as_str()))
        .collect();
    let created_ats: Int64Array = tasks
        .iter()
        .map(|t| Some(t.created_at.timestamp_millis()))
        .collect();
    let updated_ats: Int64Array = tasks
        .iter()
        .map(|t| Some(t.updated_at.timestamp_millis()))
        .collect();

    RecordBatch::try_new(
        SchemaManager::tasks_schema(),
        vec![
            Arc::new(ids),
            Arc::new(names),
            Arc::new(contents),
            Arc::new(start_dates),
            Arc::new(end_dates),
            Arc::new(category_ids),
            Arc::new(category_names),
            Arc::new(created_ats),
            Arc::new(updated_ats),
        ],
    )
    .map_err(|e| TodoError::Database(format!("Failed to create task record batch: {}", e)))
}

pub fn batch_to_tasks(batch: &RecordBatch) -> Result<Vec<Task>> {
    let ids = string_column(batch, "id")?;
    let names = string_column(batch, "name")?;
    let contents = string_column(batch, "content")?;
    let start_dates = int64_column(batch, "start_date")?;
    let end_dates = int64_column(batch, "end_date")?;
    let category_ids = string_column(batch, "category_id")?;
    let category_names = string_column(batch, "category_name")?;
    let created_ats = int64_column(batch, "created_at")?;
    let updated_ats = int64_column(batch, "updated_at")?;

    let mut tasks = Vec::with_capacity(batch.num_rows());

    for i in 0..batch.num_rows() {
        let category = match (
            optional_string(category_ids, i),
            optional_string(category_names, i),
        ) {
            (Some(id), Some(category_name)) => Some(CategoryRef { id, category_name }),
            _ => None,
        };

        tasks.push(Task {
            id: ids.value(i).to_string(),
            name: names.value(i).to_string(),
            content: contents.value(i).to_string(),
            start_date: optional_millis(start_dates, i)?,
            end_date: optional_millis(end_dates, i)?,
            category,
            created_at: millis_to_datetime(created_ats.value(i))?,
            updated_at: millis_to_datetime(updated_ats.value(i))?,
        });
    }

    Ok(tasks)
}

pub fn categories_to_batch(categories: &[Category]) -> Result<RecordBatch> {
    let ids: StringArray = categories.iter().map(|c| Some(c.id.as_str())).collect();
    let names: StringArray = categories
        .iter()
        .map(|c| Some(c.category_name.as_str()))
        .collect();
    let created_ats: Int64Array = categories
        .iter()
        .map(|c| Some(c.created_at.timestamp_millis()))
        .collect();
    let updated_ats: Int64Array = categories
        .iter()
        .map(|c| Some(c.updated_at.timestamp_millis()))
        .collect();

    RecordBatch::try_new(
        SchemaManager::categories_schema(),
        vec![
            Arc::new(ids),
            Arc::new(names),
            Arc::new(created_ats),
            Arc::new(updated_ats),
        ],
    )
    .map_err(|e| TodoError::Database(format!("Failed to create category record batch: {}", e)))
}

pub fn batch_to_categories(batch: &RecordBatch) -> Result<Vec<Category>> {
    let ids = string_column(batch, "id")?;
    let names = string_column(batch, "category_name")?;
    let created_ats = int64_column(batch, "created_at")?;
    let updated_ats = int64_column(batch, "updated_at")?;

    (0..batch.num_rows())
        .map(|i| {
            Ok(Category {
                id: ids.value(i).to_string(),
                category_name: names.value(i).to_string(),
                created_at: millis_to_datetime(created_ats.value(i))?,
                updated_at: millis_to_datetime(updated_ats.value(i))?,
            })
        })
        .collect()
}

fn string_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TodoError::Database(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| TodoError::Database(format!("Invalid '{}' column type", name)))
}

fn int64_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b Int64Array> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TodoError::Database(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| TodoError::Database(format!("Invalid '{}' column type", name)))
}

fn optional_string(array: &StringArray, i: usize) -> Option<String> {
    (!array.is_null(i)).then(|| array.value(i).to_string())
}

fn optional_millis(array: &Int64Array, i: usize) -> Result<Option<DateTime<Utc>>> {
    if array.is_null(i) {
        Ok(None)
    } else {
        millis_to_datetime(array.value(i)).map(Some)
    }
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| TodoError::Database(format!("Timestamp out of range: {}", millis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::now_millis;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn sample_task(id: &str, category: Option<CategoryRef>) -> Task {
        let now = now_millis();
        Task {
            id: id.to_string(),
            name: format!("task {}", id),
            content: "details".to_string(),
            start_date: Some(now - Duration::days(1)),
            end_date: None,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_task_batch_preserves_nulls_and_category() {
        let tasks = vec![
            sample_task("a", None),
            sample_task(
                "b",
                Some(CategoryRef {
                    id: "c1".to_string(),
                    category_name: "Home".to_string(),
                }),
            ),
        ];

        let batch = tasks_to_batch(&tasks).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let decoded = batch_to_tasks(&batch).unwrap();
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let categories = vec![Category {
            id: "c1".to_string(),
            category_name: "Work".to_string(),
            created_at: now_millis(),
            updated_at: now_millis(),
        }];
        let batch = categories_to_batch(&categories).unwrap();

        let err = batch_to_tasks(&batch).unwrap_err();
        assert!(err.to_string().contains("Missing 'name' column"));
        assert_eq!(batch_to_categories(&batch).unwrap(), categories);
    }
}
