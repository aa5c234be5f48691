//! Categories routes

use axum::Router;
use domain_categories::{CategoryService, PgCategoryRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgCategoryRepository::new(state.db.clone());
    handlers::router(CategoryService::new(repository))
}
