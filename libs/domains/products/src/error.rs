use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_categories::CategoryError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("A product named '{0}' already exists")]
    DuplicateName(String),

    #[error("Quantity must be a positive whole number, got {0}")]
    InvalidQuantity(String),

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Stock of {current} cannot grow by {requested} without exceeding {}", i32::MAX)]
    StockOverflow { current: i32, requested: i32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),

    #[error(transparent)]
    Category(CategoryError),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::StoreUnavailable(db) => AppError::Database(db),
            ProductError::Category(err) => err.into(),
            ProductError::Export(msg) => AppError::InternalServerError(msg),
            err @ (ProductError::DuplicateName(_)
            | ProductError::InvalidQuantity(_)
            | ProductError::InsufficientStock { .. }
            | ProductError::StockOverflow { .. }
            | ProductError::CategoryNotFound(_)) => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
