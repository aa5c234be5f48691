use chrono::Utc;
use database::Page;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::export::{self, ProductExport};
use crate::models::{CreateProduct, Product, ProductFilter, StockChange, UpdateProduct};
use crate::predicate::ProductQuery;
use crate::repository::ProductRepository;

/// Products with stock strictly below this show up in the low-stock report
pub const LOW_STOCK_ALERT_THRESHOLD: i32 = 10;

/// Page size used to pull every matching product into an export
pub const EXPORT_ROW_LIMIT: u64 = 9999;

static PRODUCT_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PROD-(\d+)$").unwrap());

pub fn is_product_code(code: &str) -> bool {
    PRODUCT_CODE.is_match(code)
}

/// Code following `latest`: `PROD-` plus the incremented suffix, zero-padded
/// to three digits. Starts at `PROD-001` when there is no usable previous code.
pub fn next_product_code(latest: Option<&str>) -> String {
    let previous = latest
        .and_then(|code| PRODUCT_CODE.captures(code))
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .unwrap_or(0);

    format!("PROD-{:03}", previous.saturating_add(1))
}

#[derive(Debug, Clone, Copy)]
enum StockDirection {
    Increment,
    Decrement,
}

/// Product business logic
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validates, rejects duplicate names, then assigns the next product code.
    ///
    /// Code assignment reads the latest code and inserts in separate
    /// statements, so concurrent creates can be handed the same code.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.exists_by_name(&input.name).await? {
            return Err(ProductError::DuplicateName(input.name));
        }

        let latest = self.repository.latest_product_code().await?;
        let product_code = next_product_code(latest.as_deref());

        self.repository.create(input, product_code).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Page<Product>> {
        self.repository.list(ProductQuery::from(&filter)).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.get_product(id).await?;
        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        self.get_product(id).await?;

        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn increment_stock(&self, id: Uuid, change: StockChange) -> ProductResult<Product> {
        self.change_stock(id, change, StockDirection::Increment)
            .await
    }

    /// Fails with `InsufficientStock` when asked for more than is on hand
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: Uuid, change: StockChange) -> ProductResult<Product> {
        self.change_stock(id, change, StockDirection::Decrement)
            .await
    }

    async fn change_stock(
        &self,
        id: Uuid,
        change: StockChange,
        direction: StockDirection,
    ) -> ProductResult<Product> {
        let quantity = change
            .positive_quantity()
            .ok_or_else(|| ProductError::InvalidQuantity(change.quantity.to_string()))?;

        let product = self.get_product(id).await?;

        let delta = match direction {
            StockDirection::Increment if product.stock.checked_add(quantity).is_none() => {
                return Err(ProductError::StockOverflow {
                    current: product.stock,
                    requested: quantity,
                });
            }
            StockDirection::Increment => quantity,
            StockDirection::Decrement if quantity > product.stock => {
                return Err(ProductError::InsufficientStock {
                    available: product.stock,
                    requested: quantity,
                });
            }
            StockDirection::Decrement => -quantity,
        };

        self.repository.adjust_stock(id, delta).await
    }

    #[instrument(skip(self))]
    pub async fn low_stock_products(&self) -> ProductResult<Vec<Product>> {
        self.repository
            .list_below_stock(LOW_STOCK_ALERT_THRESHOLD)
            .await
    }

    /// Renders every product matching `filter` (up to the export row limit)
    /// into a spreadsheet. Paging fields of the filter are ignored.
    #[instrument(skip(self))]
    pub async fn export_products(&self, filter: ProductFilter) -> ProductResult<ProductExport> {
        let filter = ProductFilter {
            page: Some(1),
            limit: Some(EXPORT_ROW_LIMIT),
            ..filter
        };
        let page = self.repository.list(ProductQuery::from(&filter)).await?;

        let generated_at = Utc::now();
        let content = export::render_products(&page.data, generated_at)
            .map_err(|e| ProductError::Export(e.to_string()))?;

        tracing::info!(rows = page.data.len(), bytes = content.len(), "Exported products");
        Ok(ProductExport {
            filename: export::file_name(generated_at),
            content,
        })
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;
    use crate::repository::MockProductRepository;
    use database::PageRequest;
    use mockall::predicate::eq;

    fn product(id: Uuid, stock: i32) -> Product {
        let mut product = Product::new(
            CreateProduct {
                name: "Widget".to_string(),
                description: None,
                price: 9.99,
                stock,
                status: ProductStatus::Active,
                category_id: Uuid::now_v7(),
            },
            "PROD-001".to_string(),
        );
        product.id = id;
        product
    }

    fn widget() -> CreateProduct {
        CreateProduct {
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            stock: 5,
            status: ProductStatus::Active,
            category_id: Uuid::now_v7(),
        }
    }

    #[test]
    fn test_next_product_code() {
        assert_eq!(next_product_code(None), "PROD-001");
        assert_eq!(next_product_code(Some("PROD-001")), "PROD-002");
        assert_eq!(next_product_code(Some("PROD-041")), "PROD-042");
        assert_eq!(next_product_code(Some("PROD-999")), "PROD-1000");
        assert_eq!(next_product_code(Some("PROD-1000")), "PROD-1001");
        assert_eq!(next_product_code(Some("SKU-12")), "PROD-001");
    }

    #[test]
    fn test_next_code_exceeds_previous_suffix() {
        for n in [0u64, 1, 9, 99, 998, 12345] {
            let latest = format!("PROD-{:03}", n);
            let next = next_product_code(Some(&latest));
            let suffix: u64 = next.trim_start_matches("PROD-").parse().unwrap();
            assert!(suffix > n, "{next} does not exceed {latest}");
        }
    }

    #[test]
    fn test_is_product_code() {
        assert!(is_product_code("PROD-001"));
        assert!(is_product_code("PROD-12345"));
        assert!(!is_product_code("PROD-"));
        assert!(!is_product_code("PROD-12a"));
        assert!(!is_product_code("prod-001"));
    }

    #[tokio::test]
    async fn test_first_product_gets_prod_001() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_exists_by_name()
            .withf(|name| name == "Widget")
            .returning(|_| Ok(false));
        mock_repo
            .expect_latest_product_code()
            .returning(|| Ok(None));
        mock_repo
            .expect_create()
            .withf(|_, code| code == "PROD-001")
            .returning(|input, code| Ok(Product::new(input, code)));

        let service = ProductService::new(mock_repo);
        let product = service.create_product(widget()).await.unwrap();

        assert_eq!(product.product_code, "PROD-001");
    }

    #[tokio::test]
    async fn test_create_increments_latest_code() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_exists_by_name().returning(|_| Ok(false));
        mock_repo
            .expect_latest_product_code()
            .returning(|| Ok(Some("PROD-041".to_string())));
        mock_repo
            .expect_create()
            .withf(|_, code| code == "PROD-042")
            .returning(|input, code| Ok(Product::new(input, code)));

        let service = ProductService::new(mock_repo);
        assert_eq!(
            service.create_product(widget()).await.unwrap().product_code,
            "PROD-042"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_exists_by_name().returning(|_| Ok(true));
        mock_repo.expect_latest_product_code().never();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service.create_product(widget()).await;

        assert!(matches!(result, Err(ProductError::DuplicateName(name)) if name == "Widget"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_touching_repository() {
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);

        let mut input = widget();
        input.price = -1.0;

        assert!(matches!(
            service.create_product(input).await,
            Err(ProductError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_decrement_applies_negative_delta() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|id| Ok(Some(product(id, 5))));
        mock_repo
            .expect_adjust_stock()
            .with(eq(id), eq(-3))
            .returning(|id, delta| Ok(product(id, 5 + delta)));

        let service = ProductService::new(mock_repo);
        let updated = service
            .decrement_stock(id, StockChange::new(3))
            .await
            .unwrap();

        assert_eq!(updated.stock, 2);
    }

    #[tokio::test]
    async fn test_decrement_beyond_stock_is_rejected() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(product(id, 2))));
        mock_repo.expect_adjust_stock().never();

        let service = ProductService::new(mock_repo);
        let result = service.decrement_stock(id, StockChange::new(10)).await;

        assert!(matches!(
            result,
            Err(ProductError::InsufficientStock {
                available: 2,
                requested: 10
            })
        ));
    }

    #[tokio::test]
    async fn test_increment_applies_positive_delta() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(product(id, 2))));
        mock_repo
            .expect_adjust_stock()
            .with(eq(id), eq(4))
            .returning(|id, delta| Ok(product(id, 2 + delta)));

        let service = ProductService::new(mock_repo);
        let updated = service
            .increment_stock(id, StockChange::new(4))
            .await
            .unwrap();

        assert_eq!(updated.stock, 6);
    }

    #[tokio::test]
    async fn test_increment_past_i32_max_is_rejected() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(product(id, i32::MAX - 1))));
        mock_repo.expect_adjust_stock().never();

        let service = ProductService::new(mock_repo);
        let result = service.increment_stock(id, StockChange::new(5)).await;

        assert!(matches!(
            result,
            Err(ProductError::StockOverflow {
                current,
                requested: 5
            }) if current == i32::MAX - 1
        ));
    }

    #[tokio::test]
    async fn test_invalid_quantity_is_checked_before_lookup() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().never();
        mock_repo.expect_adjust_stock().never();

        let service = ProductService::new(mock_repo);
        let change = StockChange {
            quantity: serde_json::json!("lots"),
        };

        assert!(matches!(
            service.increment_stock(Uuid::now_v7(), change).await,
            Err(ProductError::InvalidQuantity(_))
        ));
    }

    #[tokio::test]
    async fn test_stock_change_on_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_adjust_stock().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .decrement_stock(Uuid::now_v7(), StockChange::new(1))
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(Uuid::now_v7(), UpdateProduct::default())
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_low_stock_uses_alert_threshold() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list_below_stock()
            .with(eq(LOW_STOCK_ALERT_THRESHOLD))
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        assert!(service.low_stock_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_overrides_paging() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list()
            .withf(|query| {
                query.page
                    == PageRequest {
                        page: 1,
                        limit: EXPORT_ROW_LIMIT,
                    }
            })
            .returning(|query| {
                Ok(Page::new(
                    vec![product(Uuid::now_v7(), 3)],
                    1,
                    query.page,
                ))
            });

        let service = ProductService::new(mock_repo);
        let export = service
            .export_products(ProductFilter {
                page: Some(4),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(export.filename.ends_with(".xlsx"));
        assert!(export.content.starts_with(b"PK"));
    }
}
