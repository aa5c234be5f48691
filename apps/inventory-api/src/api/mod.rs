use axum::Router;

pub mod categories;
pub mod health;
pub mod products;

/// API routes without the `/api` prefix, which `create_router` adds.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/categories", categories::router(state))
        .nest("/export", products::export_router(state))
}

/// `/ready` with a real database ping; merged next to the stateless app router
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
