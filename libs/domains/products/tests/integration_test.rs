//! Integration tests for the products domain
//!
//! These use real PostgreSQL via testcontainers and need a Docker daemon.

use database::PageRequest;
use domain_categories::{CategoryError, CategoryRepository, CreateCategory, PgCategoryRepository};
use domain_products::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};
use uuid::Uuid;

struct Setup {
    _db: TestDatabase,
    products: PgProductRepository,
    categories: PgCategoryRepository,
    category_id: Uuid,
}

async fn setup(test_name: &str) -> Setup {
    let db = TestDatabase::new().await;
    let categories = PgCategoryRepository::new(db.connection());
    let category = categories
        .create(CreateCategory {
            name: TestDataBuilder::from_test_name(test_name).name("category", "main"),
        })
        .await
        .unwrap();

    Setup {
        products: PgProductRepository::new(db.connection()),
        categories,
        category_id: category.id,
        _db: db,
    }
}

fn create(name: &str, stock: i32, category_id: Uuid) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: Some("integration".to_string()),
        price: 9.99,
        stock,
        status: ProductStatus::Active,
        category_id,
    }
}

#[tokio::test]
async fn test_create_assigns_codes_through_the_service() {
    let setup = setup("product_codes").await;
    let service = ProductService::new(setup.products);

    let first = service
        .create_product(create("Widget", 5, setup.category_id))
        .await
        .unwrap();
    let second = service
        .create_product(create("Gadget", 5, setup.category_id))
        .await
        .unwrap();

    assert_eq!(first.product_code, "PROD-001");
    assert_eq!(second.product_code, "PROD-002");
    assert!(first.category.is_some());

    let duplicate = service
        .create_product(create("Widget", 1, setup.category_id))
        .await;
    assert!(matches!(duplicate, Err(ProductError::DuplicateName(_))));
}

#[tokio::test]
async fn test_unknown_category_is_reported() {
    let setup = setup("product_unknown_category").await;
    let missing = Uuid::now_v7();

    let result = setup
        .products
        .create(create("Widget", 5, missing), "PROD-001".to_string())
        .await;

    assert!(matches!(result, Err(ProductError::CategoryNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_stock_adjustments() {
    let setup = setup("product_stock").await;
    let service = ProductService::new(setup.products);
    let product = service
        .create_product(create("Widget", 5, setup.category_id))
        .await
        .unwrap();

    let updated = service
        .decrement_stock(product.id, StockChange::new(3))
        .await
        .unwrap();
    assert_eq!(updated.stock, 2);

    let result = service
        .decrement_stock(product.id, StockChange::new(10))
        .await;
    assert!(matches!(result, Err(ProductError::InsufficientStock { .. })));

    let restored = service
        .increment_stock(product.id, StockChange::new(3))
        .await
        .unwrap();
    assert_eq!(restored.stock, 5);
}

#[tokio::test]
async fn test_list_filters_and_low_stock() {
    let setup = setup("product_list").await;
    for (i, stock) in [0, 3, 9, 40].into_iter().enumerate() {
        setup
            .products
            .create(
                create(&format!("Item {i}"), stock, setup.category_id),
                format!("PROD-{:03}", i + 1),
            )
            .await
            .unwrap();
    }

    let query = ProductQuery {
        predicates: vec![ProductPredicate::StockBucket(StockStatus::Low)],
        order: SortOrder::Asc,
        page: PageRequest::new(Some(1), Some(1)),
    };
    let page = setup.products.list(query).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.data[0].stock, 3);
    assert!(page.data[0].category.is_some());

    let low = setup
        .products
        .list_below_stock(LOW_STOCK_ALERT_THRESHOLD)
        .await
        .unwrap();
    let stocks: Vec<i32> = low.iter().map(|p| p.stock).collect();
    assert_eq!(stocks, vec![0, 3, 9]);

    assert_eq!(
        setup.products.latest_product_code().await.unwrap().as_deref(),
        Some("PROD-004")
    );
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let setup = setup("product_category_in_use").await;
    let product = setup
        .products
        .create(create("Widget", 5, setup.category_id), "PROD-001".to_string())
        .await
        .unwrap();

    let result = setup.categories.delete(setup.category_id).await;
    assert!(matches!(result, Err(CategoryError::InUse(_))));

    assert!(setup.products.delete(product.id).await.unwrap());
    assert!(setup.categories.delete(setup.category_id).await.unwrap());
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let setup = setup("product_update").await;
    let product = setup
        .products
        .create(create("Widget", 5, setup.category_id), "PROD-001".to_string())
        .await
        .unwrap();

    let updated = setup
        .products
        .update(
            product.id,
            UpdateProduct {
                status: Some(ProductStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_uuid_eq(updated.id, product.id, "product id");
    assert_eq!(updated.status, ProductStatus::Inactive);
    assert_eq!(updated.stock, 5);
    assert_eq!(updated.product_code, "PROD-001");

    let fetched = assert_some(
        setup.products.get_by_id(product.id).await.unwrap(),
        "product",
    );
    assert_eq!(fetched.status, ProductStatus::Inactive);
}
