use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Category {0} is still referenced by products")]
    InUse(Uuid),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(id) => AppError::NotFound(format!("Category {} not found", id)),
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::InUse(id) => AppError::Conflict(format!(
                "Category {} is still referenced by products",
                id
            )),
            CategoryError::StoreUnavailable(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
