//! Handler tests for the categories domain
//!
//! These run the domain router against the in-memory repository and check
//! status codes, JSON shapes and error bodies.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_categories::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(repo: InMemoryCategoryRepository) -> axum::Router {
    handlers::router(CategoryService::new(repo))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_category_returns_201() {
    let response = app(InMemoryCategoryRepository::new())
        .oneshot(post_json("/", json!({ "name": "Hardware" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let category: Category = json_body(response.into_body()).await;
    assert_eq!(category.name, "Hardware");
}

#[tokio::test]
async fn test_create_category_rejects_empty_name() {
    let response = app(InMemoryCategoryRepository::new())
        .oneshot(post_json("/", json!({ "name": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_categories_is_paged() {
    let repo = InMemoryCategoryRepository::new();
    for name in ["Garden", "Garage", "Kitchen"] {
        repo.create(CreateCategory {
            name: name.to_string(),
        })
        .await
        .unwrap();
    }

    let response = app(repo)
        .oneshot(
            Request::builder()
                .uri("/?search=GAR&limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_categories_with_huge_page_or_limit() {
    let repo = InMemoryCategoryRepository::new();
    repo.create(CreateCategory {
        name: "Garden".to_string(),
    })
    .await
    .unwrap();

    for (uri, rows) in [
        ("/?page=18446744073709551615", 0),
        ("/?limit=9223372036854775808", 1),
    ] {
        let response = app(repo.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), rows, "{uri}");
    }
}

#[tokio::test]
async fn test_get_category_with_malformed_id_returns_400() {
    let response = app(InMemoryCategoryRepository::new())
        .oneshot(
            Request::builder()
                .uri("/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_category_returns_404() {
    let response = app(InMemoryCategoryRepository::new())
        .oneshot(
            Request::builder()
                .uri(format!("/{}", uuid::Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_category_changes_name() {
    let repo = InMemoryCategoryRepository::new();
    let category = repo
        .create(CreateCategory {
            name: "Old".to_string(),
        })
        .await
        .unwrap();

    let response = app(repo)
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}", category.id))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": "New" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated: Category = json_body(response.into_body()).await;
    assert_eq!(updated.id, category.id);
    assert_eq!(updated.name, "New");
    assert_eq!(updated.created_at, category.created_at);
}

#[tokio::test]
async fn test_delete_referenced_category_returns_409() {
    let repo = InMemoryCategoryRepository::new();
    let category = repo
        .create(CreateCategory {
            name: "Tools".to_string(),
        })
        .await
        .unwrap();
    repo.link_product(uuid::Uuid::now_v7(), category.id)
        .await
        .unwrap();

    let response = app(repo)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", category.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_category_returns_204() {
    let repo = InMemoryCategoryRepository::new();
    let category = repo
        .create(CreateCategory {
            name: "Tools".to_string(),
        })
        .await
        .unwrap();

    let response = app(repo.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", category.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(repo.get_by_id(category.id).await.unwrap().is_none());
}
