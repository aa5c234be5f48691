use async_trait::async_trait;
use database::{Page, PageRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>>;

    /// Newest first, optionally filtered by a case-insensitive name substring
    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> CategoryResult<Page<Category>>;

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category>;

    /// Returns `false` if nothing was deleted, `InUse` if products still reference it
    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
///
/// Clones share state. The in-memory product repository records which
/// category each product points at through [`link_product`](Self::link_product),
/// which lets `delete` refuse referenced categories like the foreign key does.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    /// product id → category id
    references: Arc<RwLock<HashMap<Uuid, Uuid>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `product_id` at `category_id`. Fails if the category does not exist.
    pub async fn link_product(&self, product_id: Uuid, category_id: Uuid) -> CategoryResult<()> {
        let categories = self.categories.read().await;
        if !categories.contains_key(&category_id) {
            return Err(CategoryError::NotFound(category_id));
        }

        self.references
            .write()
            .await
            .insert(product_id, category_id);
        Ok(())
    }

    pub async fn unlink_product(&self, product_id: Uuid) {
        self.references.write().await.remove(&product_id);
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let category = Category::new(input);
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> CategoryResult<Page<Category>> {
        let categories = self.categories.read().await;

        let mut matching: Vec<Category> = categories
            .values()
            .filter(|c| search.as_deref().is_none_or(|s| c.name_contains(s)))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();

        Ok(Page::new(data, total, page))
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;
        let category = categories.get_mut(&id).ok_or(CategoryError::NotFound(id))?;

        category.apply_update(input);

        tracing::info!(category_id = %id, "Updated category");
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        if self.references.read().await.values().any(|c| *c == id) {
            return Err(CategoryError::InUse(id));
        }

        if self.categories.write().await.remove(&id).is_some() {
            tracing::info!(category_id = %id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
