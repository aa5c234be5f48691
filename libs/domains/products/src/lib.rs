//! Products Domain
//!
//! Catalog products with stock tracking, sequential product codes and
//! spreadsheet export.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (/products, /export)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, code assignment, stock rules, export
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory / Postgres)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Predicate  │  ← Typed filters → SeaORM condition or in-memory matcher
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::InMemoryCategoryRepository;
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let categories = InMemoryCategoryRepository::new();
//! let service = ProductService::new(InMemoryProductRepository::new(categories));
//! let products = handlers::router(service.clone());
//! let export = handlers::export_router(service);
//! ```

pub mod entity;
pub mod error;
pub mod export;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod predicate;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use export::ProductExport;
pub use models::{
    CreateProduct, Product, ProductFilter, ProductStatus, SortOrder, StockChange, StockStatus,
    UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use predicate::{ProductPredicate, ProductQuery};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::{LOW_STOCK_ALERT_THRESHOLD, ProductService, next_product_code};
