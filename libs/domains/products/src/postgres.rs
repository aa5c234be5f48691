use async_trait::async_trait;
use database::Page;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, SortOrder, UpdateProduct},
    predicate::{ProductQuery, build_condition},
    repository::ProductRepository,
};

use domain_categories::entity::Entity as CategoryEntity;

const PRODUCT_CODE_PATTERN: &str = "^PROD-[0-9]+$";

/// Foreign-key violations on product writes mean the category is missing
fn write_error(e: DbErr, category_id: Uuid) -> ProductError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ProductError::CategoryNotFound(category_id)
        }
        _ => ProductError::StoreUnavailable(e),
    }
}

fn order_of(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_joined(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let row = entity::Entity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await?;

        Ok(row.map(|(product, category)| Product::from_row(product, category)))
    }

    async fn find_joined_or_missing(&self, id: Uuid) -> ProductResult<Product> {
        self.find_joined(id).await?.ok_or(ProductError::NotFound(id))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct, product_code: String) -> ProductResult<Product> {
        let category_id = input.category_id;
        let active_model = entity::ActiveModel::from_create(input, product_code);

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, category_id))?;

        tracing::info!(product_id = %model.id, code = %model.product_code, "Created product");
        self.find_joined_or_missing(model.id).await
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        self.find_joined(id).await
    }

    async fn list(&self, query: ProductQuery) -> ProductResult<Page<Product>> {
        let select = entity::Entity::find().filter(build_condition(&query.predicates));

        let total = select.clone().count(&self.db).await?;

        let order = order_of(query.order);
        let rows = select
            .find_also_related(CategoryEntity)
            .order_by(entity::Column::CreatedAt, order.clone())
            .order_by(entity::Column::Id, order)
            .offset(query.page.offset())
            .limit(query.page.limit)
            .all(&self.db)
            .await?;

        let data = rows
            .into_iter()
            .map(|(product, category)| Product::from_row(product, category))
            .collect();

        Ok(Page::new(data, total, query.page))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let category_id = input.category_id.unwrap_or(model.category_id);
        let mut active_model: entity::ActiveModel = model.into();

        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if let Some(description) = input.description {
            active_model.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            active_model.price = Set(price);
        }
        if let Some(stock) = input.stock {
            active_model.stock = Set(stock);
        }
        if let Some(status) = input.status {
            active_model.status = Set(status);
        }
        if let Some(category_id) = input.category_id {
            active_model.category_id = Set(category_id);
        }

        if active_model.is_changed() {
            active_model
                .update(&self.db)
                .await
                .map_err(|e| write_error(e, category_id))?;
        }

        tracing::info!(product_id = %id, "Updated product");
        self.find_joined_or_missing(id).await
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn latest_product_code(&self) -> ProductResult<Option<String>> {
        let latest = entity::Entity::find()
            .filter(Expr::cust_with_values(
                r#""products"."product_code" ~ $1"#,
                [PRODUCT_CODE_PATTERN],
            ))
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .one(&self.db)
            .await?;

        Ok(latest.map(|model| model.product_code))
    }

    async fn adjust_stock(&self, id: Uuid, delta: i32) -> ProductResult<Product> {
        let result = entity::Entity::update_many()
            .col_expr(
                entity::Column::Stock,
                Expr::col(entity::Column::Stock).add(delta),
            )
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }

        let product = self.find_joined_or_missing(id).await?;
        tracing::info!(product_id = %id, delta, stock = product.stock, "Adjusted stock");
        Ok(product)
    }

    async fn list_below_stock(&self, threshold: i32) -> ProductResult<Vec<Product>> {
        let rows = entity::Entity::find()
            .filter(entity::Column::Stock.lt(threshold))
            .find_also_related(CategoryEntity)
            .order_by_asc(entity::Column::Stock)
            .order_by_asc(entity::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product, category)| Product::from_row(product, category))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::PageRequest;
    use database::pagination::MAX_LIMIT;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    #[test]
    fn test_latest_code_query_matches_pattern_newest_first() {
        let sql = entity::Entity::find()
            .filter(Expr::cust_with_values(
                r#""products"."product_code" ~ $1"#,
                [PRODUCT_CODE_PATTERN],
            ))
            .order_by_desc(entity::Column::CreatedAt)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#""products"."product_code" ~ '^PROD-[0-9]+$'"#),
            "unexpected SQL: {sql}"
        );
        assert!(
            sql.contains(r#"ORDER BY "products"."created_at" DESC"#),
            "unexpected SQL: {sql}"
        );
    }

    #[test]
    fn test_stock_delta_is_a_single_update() {
        let id = Uuid::now_v7();
        let sql = entity::Entity::update_many()
            .col_expr(
                entity::Column::Stock,
                Expr::col(entity::Column::Stock).add(-3),
            )
            .filter(entity::Column::Id.eq(id))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.starts_with(r#"UPDATE "products""#), "unexpected SQL: {sql}");
        assert!(sql.contains(r#""stock" + -3"#), "unexpected SQL: {sql}");
        assert!(sql.contains(&id.to_string()), "unexpected SQL: {sql}");
    }

    #[test]
    fn test_listing_joins_category() {
        let sql = entity::Entity::find()
            .find_also_related(CategoryEntity)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#"LEFT JOIN "categories""#),
            "unexpected SQL: {sql}"
        );
    }

    #[test]
    fn test_huge_page_binds_offset_within_i64() {
        let page = PageRequest::new(Some(u64::MAX), Some(u64::MAX));
        let sql = entity::Entity::find()
            .offset(page.offset())
            .limit(page.limit)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(&format!("LIMIT {MAX_LIMIT} OFFSET {}", i64::MAX)),
            "unexpected SQL: {sql}"
        );
    }

    #[tokio::test]
    async fn test_adjust_stock_on_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PgProductRepository::new(db);
        let result = repo.adjust_stock(Uuid::now_v7(), 5).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PgProductRepository::new(db);
        assert!(repo.delete(Uuid::now_v7()).await.unwrap());
    }
}
