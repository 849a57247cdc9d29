// file: src/database/category_repo.rs
// description: category persistence over the LanceDB categories table

use crate::database::client::LanceDbClient;
use crate::database::filter;
use crate::database::records::{batch_to_categories, categories_to_batch};
use crate::database::schema::SchemaManager;
use crate::error::{Result, TodoError};
use crate::models::Category;
use arrow_array::RecordBatchIterator;
use tracing::debug;

#[derive(Clone)]
pub struct CategoryRepository {
    client: LanceDbClient,
}

impl CategoryRepository {
    pub fn new(client: LanceDbClient) -> Self {
        Self { client }
    }

    fn table_name(&self) -> &str {
        self.client.categories_table()
    }

    async fn fetch(&self, filter: Option<String>, limit: usize) -> Result<Vec<Category>> {
        let batches = self
            .client
            .query_batches(self.table_name(), filter.as_deref(), limit, 0)
            .await?;

        let mut categories = Vec::new();
        for batch in &batches {
            categories.extend(batch_to_categories(batch)?);
        }
        Ok(categories)
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let total = self.count().await?;
        self.fetch(None, total).await
    }

    pub async fn count(&self) -> Result<usize> {
        self.client.count_rows(self.table_name(), None).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.fetch(Some(filter::id_equals(id)), 1).await?.pop())
    }

    /// Exact, case-sensitive lookup.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .fetch(Some(filter::category_name_equals(name)), 1)
            .await?
            .pop())
    }

    pub async fn insert(&self, category: &Category) -> Result<()> {
        let schema = SchemaManager::categories_schema();
        let batch = categories_to_batch(std::slice::from_ref(category))?;

        let table = self.client.get_table(self.table_name()).await?;
        table
            .add(RecordBatchIterator::new(vec![Ok(batch)], schema))
            .execute()
            .await
            .map_err(|e| TodoError::Database(format!("Failed to insert category: {}", e)))?;

        debug!("Inserted category: {}", category.category_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::now_millis;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default_config().database;
        config.uri = dir.path().display().to_string();
        let client = LanceDbClient::new(config).await.unwrap();
        SchemaManager::new(&client).initialize().await.unwrap();
        let repo = CategoryRepository::new(client);

        assert!(repo.list().await.unwrap().is_empty());

        let category = Category {
            id: "0b7f6c1e-3a47-4a40-9d7e-0b4b5a0f8f11".to_string(),
            category_name: "Kid's stuff".to_string(),
            created_at: now_millis(),
            updated_at: now_millis(),
        };
        repo.insert(&category).await.unwrap();

        assert_eq!(
            repo.find_by_name("Kid's stuff").await.unwrap(),
            Some(category.clone())
        );
        assert_eq!(repo.find_by_name("kid's stuff").await.unwrap(), None);
        assert_eq!(repo.get(&category.id).await.unwrap(), Some(category));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
