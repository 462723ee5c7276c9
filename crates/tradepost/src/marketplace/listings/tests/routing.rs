use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::marketplace::listings::domain::UserId;
use crate::marketplace::listings::fields::schema::SubmittedField;
use crate::marketplace::listings::router::{listing_router, submit_handler};
use crate::marketplace::listings::service::ListingService;

type MemoryService =
    ListingService<MemoryPostStore, MemoryPhotoStore, MemoryBlockStore, MemorySchemaStore>;

fn arc_service() -> Arc<MemoryService> {
    let (service, _, _, _) = build_service();
    Arc::new(service)
}

#[tokio::test]
async fn submit_handler_returns_created_for_valid_submissions() {
    let service = arc_service();

    let response = submit_handler::<
        MemoryPostStore,
        MemoryPhotoStore,
        MemoryBlockStore,
        MemorySchemaStore,
    >(State(service), axum::Json(submission()))
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("uuid").is_some());
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_with_report_body() {
    let service = arc_service();
    let mut rejected = submission();
    rejected.additional_fields = vec![
        SubmittedField::new("finish", json!("gilded")),
        SubmittedField::new("finish", json!("gilded")),
    ];

    let response = submit_handler::<
        MemoryPostStore,
        MemoryPhotoStore,
        MemoryBlockStore,
        MemorySchemaStore,
    >(State(service), axum::Json(rejected))
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["duplicate_aliases"], json!(true));
    assert_eq!(payload["missing_required"], json!(["rooms"]));
    assert!(payload["errors"].as_array().is_some());
}

#[tokio::test]
async fn listing_route_returns_not_found_for_missing_posts() {
    let router = listing_router(arc_service());

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/posts/404")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_route_accepts_payloads() {
    let router = listing_router(arc_service());

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/posts")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["title"], json!("Two-room apartment"));
}

#[tokio::test]
async fn feed_route_reflects_blocks() {
    let (service, _, _, _) = build_service();
    let service = Arc::new(service);
    let first = service.submit(submission()).expect("accepted");
    let second = service.submit(submission()).expect("accepted");
    service
        .block_for_viewer(UserId(42), second.id)
        .expect("block recorded");

    let router = listing_router(service);
    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/feed/42")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let feed = payload.as_array().expect("feed is an array");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["id"], json!(first.id.0));
}

#[tokio::test]
async fn block_routes_return_created() {
    let (service, _, _, _) = build_service();
    let service = Arc::new(service);
    let stored = service.submit(submission()).expect("accepted");

    let router = listing_router(service.clone());
    let response = router
        .oneshot(
            axum::http::Request::post(format!("/api/v1/posts/{}/blocks", stored.id.0))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "viewer": 42 })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let router = listing_router(service);
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/moderation/blocks")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "moderator": 1, "post": stored.id.0 })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn photo_routes_attach_and_resolve() {
    let (service, _, _, _) = build_service();
    let service = Arc::new(service);
    let stored = service.submit(submission()).expect("accepted");

    let router = listing_router(service.clone());
    let response = router
        .oneshot(
            axum::http::Request::post(format!("/api/v1/posts/{}/photos", stored.id.0))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "url": "pics/a.jpg" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = read_json_body(response).await;

    let router = listing_router(service);
    let response = router
        .oneshot(
            axum::http::Request::get(format!(
                "/api/v1/posts/{}/photos/{}",
                stored.id.0, photo["id"]
            ))
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["url"], json!("pics/a.jpg"));
}

#[tokio::test]
async fn handler_maps_store_outages_to_internal_error() {
    let posts = Arc::new(UnavailablePostStore);
    let photos = Arc::new(MemoryPhotoStore::default());
    let blocks = Arc::new(MemoryBlockStore::default());
    let schemas = Arc::new(MemorySchemaStore::with_demo_schema());
    let service = Arc::new(ListingService::new(posts, photos, blocks, schemas));

    let response = submit_handler::<
        UnavailablePostStore,
        MemoryPhotoStore,
        MemoryBlockStore,
        MemorySchemaStore,
    >(State(service), axum::Json(submission()))
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn edit_route_patches_posts() {
    let (service, _, _, _) = build_service();
    let service = Arc::new(service);
    let stored = service.submit(submission()).expect("accepted");

    let router = listing_router(service);
    let response = router
        .oneshot(
            axum::http::Request::patch(format!("/api/v1/posts/{}", stored.id.0))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "price": 90000.0 })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["price"], json!(90000.0));
}
