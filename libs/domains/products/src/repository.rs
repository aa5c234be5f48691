use async_trait::async_trait;
use database::Page;
use domain_categories::{CategoryError, CategoryRepository, InMemoryCategoryRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, SortOrder, UpdateProduct};
use crate::predicate::{ProductQuery, matches_all};
use crate::service::is_product_code;

/// Repository trait for Product persistence
///
/// Every product returned carries its category.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts with an already assigned code. Unknown category → `CategoryNotFound`.
    async fn create(&self, input: CreateProduct, product_code: String) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Filtered page ordered by creation time, plus the unpaged match count
    async fn list(&self, query: ProductQuery) -> ProductResult<Page<Product>>;

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    async fn exists_by_name(&self, name: &str) -> ProductResult<bool>;

    /// Code of the most recently created product whose code looks like `PROD-<digits>`
    async fn latest_product_code(&self) -> ProductResult<Option<String>>;

    /// Adds `delta` (possibly negative) to the stock in one statement and
    /// returns the updated product
    async fn adjust_stock(&self, id: Uuid, delta: i32) -> ProductResult<Product>;

    /// Products with stock strictly below `threshold`, lowest stock first
    async fn list_below_stock(&self, threshold: i32) -> ProductResult<Vec<Product>>;
}

fn category_error(err: CategoryError, category_id: Uuid) -> ProductError {
    match err {
        CategoryError::NotFound(_) => ProductError::CategoryNotFound(category_id),
        other => ProductError::Category(other),
    }
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Shares a category store with the category service so that product writes
/// see the same categories and category deletes see product references.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    categories: InMemoryCategoryRepository,
}

impl InMemoryProductRepository {
    pub fn new(categories: InMemoryCategoryRepository) -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            categories,
        }
    }

    async fn with_category(&self, mut product: Product) -> ProductResult<Product> {
        product.category = self
            .categories
            .get_by_id(product.category_id)
            .await
            .map_err(ProductError::Category)?;
        Ok(product)
    }

    async fn with_categories(&self, products: Vec<Product>) -> ProductResult<Vec<Product>> {
        let mut joined = Vec::with_capacity(products.len());
        for product in products {
            joined.push(self.with_category(product).await?);
        }
        Ok(joined)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct, product_code: String) -> ProductResult<Product> {
        let product = Product::new(input, product_code);

        self.categories
            .link_product(product.id, product.category_id)
            .await
            .map_err(|e| category_error(e, product.category_id))?;

        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, code = %product.product_code, "Created product");
        self.with_category(product).await
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.products.read().await.get(&id).cloned();
        match product {
            Some(product) => Ok(Some(self.with_category(product).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, query: ProductQuery) -> ProductResult<Page<Product>> {
        let mut matching: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| matches_all(&query.predicates, p))
            .cloned()
            .collect();

        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if query.order == SortOrder::Desc {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .collect();

        Ok(Page::new(self.with_categories(data).await?, total, query.page))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        if let Some(category_id) = input.category_id {
            if !self.products.read().await.contains_key(&id) {
                return Err(ProductError::NotFound(id));
            }
            self.categories
                .link_product(id, category_id)
                .await
                .map_err(|e| category_error(e, category_id))?;
        }

        let updated = {
            let mut products = self.products.write().await;
            let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
            product.apply_update(input);
            product.clone()
        };

        tracing::info!(product_id = %id, "Updated product");
        self.with_category(updated).await
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        if self.products.write().await.remove(&id).is_none() {
            return Ok(false);
        }

        self.categories.unlink_product(id).await;
        tracing::info!(product_id = %id, "Deleted product");
        Ok(true)
    }

    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        Ok(self.products.read().await.values().any(|p| p.name == name))
    }

    async fn latest_product_code(&self) -> ProductResult<Option<String>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|p| is_product_code(&p.product_code))
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .map(|p| p.product_code.clone()))
    }

    async fn adjust_stock(&self, id: Uuid, delta: i32) -> ProductResult<Product> {
        let updated = {
            let mut products = self.products.write().await;
            let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;

            let stock = match product.stock.checked_add(delta) {
                Some(stock) if stock >= 0 => stock,
                Some(_) => {
                    return Err(ProductError::InsufficientStock {
                        available: product.stock,
                        requested: delta.saturating_neg(),
                    });
                }
                None => {
                    return Err(ProductError::StockOverflow {
                        current: product.stock,
                        requested: delta,
                    });
                }
            };
            product.stock = stock;
            product.clone()
        };

        tracing::info!(product_id = %id, delta, stock = updated.stock, "Adjusted stock");
        self.with_category(updated).await
    }

    async fn list_below_stock(&self, threshold: i32) -> ProductResult<Vec<Product>> {
        let mut low: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.stock < threshold)
            .cloned()
            .collect();

        low.sort_by(|a, b| {
            a.stock
                .cmp(&b.stock)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        self.with_categories(low).await
    }
}
