use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PhotoId, PostId, UserId};
use super::repository::{BlockStore, PhotoStore, PostPatch, PostStore, SchemaStore, StoreError};
use super::service::{ListingService, ListingServiceError, ListingSubmission};

/// Router builder exposing HTTP endpoints for listings, blocks, and the feed.
pub fn listing_router<P, H, B, S>(service: Arc<ListingService<P, H, B, S>>) -> Router
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    Router::new()
        .route("/api/v1/posts", post(submit_handler::<P, H, B, S>))
        .route(
            "/api/v1/posts/:post_id",
            get(listing_handler::<P, H, B, S>).patch(edit_handler::<P, H, B, S>),
        )
        .route(
            "/api/v1/posts/:post_id/photos",
            post(attach_photo_handler::<P, H, B, S>),
        )
        .route(
            "/api/v1/posts/:post_id/photos/:photo_id",
            get(photo_url_handler::<P, H, B, S>),
        )
        .route(
            "/api/v1/posts/:post_id/blocks",
            post(personal_block_handler::<P, H, B, S>),
        )
        .route(
            "/api/v1/moderation/blocks",
            post(moderator_block_handler::<P, H, B, S>),
        )
        .route("/api/v1/feed/:viewer_id", get(feed_handler::<P, H, B, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttachPhotoRequest {
    pub(crate) url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonalBlockRequest {
    pub(crate) viewer: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModeratorBlockRequest {
    pub(crate) moderator: i64,
    pub(crate) post: i64,
}

fn error_response(error: ListingServiceError) -> Response {
    match error {
        ListingServiceError::Rejected(report) => {
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(report)).into_response()
        }
        ListingServiceError::Store(StoreError::NotFound) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ListingServiceError::Store(StoreError::Conflict) => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    axum::Json(submission): axum::Json<ListingSubmission>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.submit(submission) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn listing_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    Path(post_id): Path<i64>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.listing(PostId(post_id)) {
        Ok(Some(listing)) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn edit_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    Path(post_id): Path<i64>,
    axum::Json(patch): axum::Json<PostPatch>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.edit(PostId(post_id), patch) {
        Ok(updated) => (StatusCode::OK, axum::Json(updated)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn attach_photo_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    Path(post_id): Path<i64>,
    axum::Json(request): axum::Json<AttachPhotoRequest>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.attach_photo(PostId(post_id), request.url) {
        Ok(photo) => (StatusCode::CREATED, axum::Json(photo)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn photo_url_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    Path((post_id, photo_id)): Path<(i64, i64)>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.photo_url(PostId(post_id), PhotoId(photo_id)) {
        Ok(url) => (StatusCode::OK, axum::Json(json!({ "url": url }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn personal_block_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    Path(post_id): Path<i64>,
    axum::Json(request): axum::Json<PersonalBlockRequest>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.block_for_viewer(UserId(request.viewer), PostId(post_id)) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn moderator_block_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    axum::Json(request): axum::Json<ModeratorBlockRequest>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.block_by_moderator(UserId(request.moderator), PostId(request.post)) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn feed_handler<P, H, B, S>(
    State(service): State<Arc<ListingService<P, H, B, S>>>,
    Path(viewer_id): Path<i64>,
) -> Response
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    match service.feed(UserId(viewer_id)) {
        Ok(feed) => (StatusCode::OK, axum::Json(feed)).into_response(),
        Err(error) => error_response(error),
    }
}
