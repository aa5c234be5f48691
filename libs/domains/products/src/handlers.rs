use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    AppError, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use database::Page;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::export::XLSX_CONTENT_TYPE;
use crate::models::{
    CreateProduct, Product, ProductFilter, ProductStatus, StockChange, StockStatus, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "products";
pub const EXPORT_TAG: &str = "export";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        low_stock_products,
        get_product,
        update_product,
        delete_product,
        increment_stock,
        decrement_stock,
    ),
    components(
        schemas(
            Product,
            CreateProduct,
            UpdateProduct,
            ProductStatus,
            StockStatus,
            StockChange,
            Page<Product>
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog and stock endpoints")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(export_products),
    tags(
        (name = EXPORT_TAG, description = "Spreadsheet export")
    )
)]
pub struct ExportApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    // `/stock-low` is a static segment, so it wins over `/{id}`
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/stock-low", get(low_stock_products))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/increment", patch(increment_stock))
        .route("/{id}/decrement", patch(decrement_stock))
        .with_state(shared_service)
}

pub fn export_router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/", get(export_products))
        .with_state(Arc::new(service))
}

/// List products with filters and pagination
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Paged products", body = Page<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<Page<Product>>> {
    let page = service.list_products(filter).await?;
    Ok(Json(page))
}

/// Create a product; the product code is assigned by the server
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Products with fewer than 10 units in stock, lowest first
#[utoipa::path(
    get,
    path = "/stock-low",
    tag = TAG,
    responses(
        (status = 200, description = "Low stock products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn low_stock_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.low_stock_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/{id}/increment",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockChange,
    responses(
        (status = 200, description = "Stock increased", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn increment_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    body: Result<Json<StockChange>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(change) = body?;
    let product = service.increment_stock(id, change).await?;
    Ok(Json(product))
}

/// Decrease stock; fails if more is requested than is available
#[utoipa::path(
    patch,
    path = "/{id}/decrement",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockChange,
    responses(
        (status = 200, description = "Stock decreased", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn decrement_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    body: Result<Json<StockChange>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(change) = body?;
    let product = service.decrement_stock(id, change).await?;
    Ok(Json(product))
}

/// Download matching products as an `.xlsx` workbook
#[utoipa::path(
    get,
    path = "",
    tag = EXPORT_TAG,
    params(ProductFilter),
    responses(
        (
            status = 200,
            description = "Spreadsheet attachment",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn export_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<impl IntoResponse> {
    let export = service.export_products(filter).await?;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];
    Ok((headers, export.content))
}
