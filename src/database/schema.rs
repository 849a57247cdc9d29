// file: src/database/schema.rs
// description: LanceDB schema management for the tasks and categories tables
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::error::{Result, TodoError};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SchemaManager<'a> {
    client: &'a LanceDbClient,
}

impl<'a> SchemaManager<'a> {
    pub fn new(client: &'a LanceDbClient) -> Self {
        Self { client }
    }

    /// Creates any missing table empty, leaving existing ones untouched.
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing LanceDB schema");

        let tables = [
            (self.client.tasks_table(), Self::tasks_schema()),
            (self.client.categories_table(), Self::categories_schema()),
        ];

        for (table_name, schema) in tables {
            if self.client.table_exists(table_name).await? {
                info!("Table '{}' already exists", table_name);
                continue;
            }

            self.client
                .get_connection()
                .create_empty_table(table_name, schema)
                .execute()
                .await
                .map_err(|e| {
                    TodoError::Database(format!("Failed to create table {}: {}", table_name, e))
                })?;
            info!("Created table '{}'", table_name);
        }

        Ok(())
    }

    pub async fn verify_schema(&self) -> Result<bool> {
        let mut complete = true;

        for table_name in [self.client.tasks_table(), self.client.categories_table()] {
            if self.client.table_exists(table_name).await? {
                info!("Table '{}' exists", table_name);
            } else {
                warn!("Table '{}' does not exist", table_name);
                complete = false;
            }
        }

        Ok(complete)
    }

    /// Dates are UTC epoch milliseconds; null when unset.
    pub fn tasks_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("start_date", DataType::Int64, true),
            Field::new("end_date", DataType::Int64, true),
            // Category reference, denormalized so reads need no join
            Field::new("category_id", DataType::Utf8, true),
            Field::new("category_name", DataType::Utf8, true),
            Field::new("created_at", DataType::Int64, false),
            Field::new("updated_at", DataType::Int64, false),
        ]))
    }

    pub fn categories_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("category_name", DataType::Utf8, false),
            Field::new("created_at", DataType::Int64, false),
            Field::new("updated_at", DataType::Int64, false),
        ]))
    }

    pub async fn drop_all_tables(&self) -> Result<()> {
        warn!("Dropping all tables in LanceDB");

        for table_name in [self.client.tasks_table(), self.client.categories_table()] {
            if self.client.table_exists(table_name).await? {
                self.client
                    .get_connection()
                    .drop_table(table_name)
                    .await
                    .map_err(|e| {
                        TodoError::Database(format!("Failed to drop table {}: {}", table_name, e))
                    })?;
                info!("Dropped table: {}", table_name);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_schema_generation() {
        let schema = SchemaManager::tasks_schema();
        assert_eq!(schema.fields().len(), 9);
        assert!(schema.field_with_name("start_date").unwrap().is_nullable());
        assert!(!schema.field_with_name("name").unwrap().is_nullable());

        let schema = SchemaManager::categories_schema();
        assert_eq!(schema.fields().len(), 4);
    }

    #[tokio::test]
    async fn test_initialize_verify_and_drop() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default_config().database;
        config.uri = dir.path().display().to_string();

        let client = LanceDbClient::new(config).await.unwrap();
        let schema = SchemaManager::new(&client);

        assert!(!schema.verify_schema().await.unwrap());
        schema.initialize().await.unwrap();
        assert!(schema.verify_schema().await.unwrap());

        // Idempotent
        schema.initialize().await.unwrap();

        schema.drop_all_tables().await.unwrap();
        assert!(!schema.verify_schema().await.unwrap());
    }
}
