// file: src/service/category_service.rs
// description: category listing, explicit creation and find-or-create

use crate::database::CategoryRepository;
use crate::error::{Result, TodoError};
use crate::models::{Category, NewCategory, now_millis};
use crate::utils::Validator;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Clones share one creation lock, so a name is looked up and inserted
/// without another creation in between.
#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
    creation: Arc<Mutex<()>>,
}

impl CategoryService {
    pub fn new(repo: CategoryRepository) -> Self {
        Self {
            repo,
            creation: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.repo.list().await
    }

    /// Fails with a conflict when the name is already taken.
    pub async fn create(&self, input: NewCategory) -> Result<Category> {
        let name = Validator::require_text("categoryName", input.category_name.as_deref())?;
        let _guard = self.creation.lock().await;

        if self.repo.find_by_name(&name).await?.is_some() {
            return Err(TodoError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        self.insert(name).await
    }

    /// Returns the category with this name, creating it when it is new.
    pub async fn ensure(&self, name: &str) -> Result<Category> {
        let name = Validator::require_text("category", Some(name))?;
        let _guard = self.creation.lock().await;

        match self.repo.find_by_name(&name).await? {
            Some(existing) => Ok(existing),
            None => self.insert(name).await,
        }
    }

    async fn insert(&self, category_name: String) -> Result<Category> {
        let now = now_millis();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            category_name,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&category).await?;
        info!("Created category: {}", category.category_name);
        Ok(category)
    }
}
