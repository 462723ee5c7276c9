use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for marketplace posts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PostId(pub i64);

/// Identifier wrapper for registered users (owners, viewers, moderators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identifier wrapper for photo records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoId(pub i64);

/// A stored marketplace listing. Created once, edited in place, never hard
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub trade: bool,
    pub owner: UserId,
}

/// A photo record attached to a post. Many per post, insertion order only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPhoto {
    pub id: PhotoId,
    pub post: PostId,
    pub url: String,
}

/// A viewer-scoped hide: the post stays visible to everyone else.
/// Append-only; the same viewer may block the same post twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBlock {
    pub viewer: UserId,
    pub post: PostId,
    pub blocked_at: DateTime<Utc>,
}

/// A moderator-issued hide, applied for every viewer. Same append-only shape
/// as [`PersonalBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorBlock {
    pub moderator: UserId,
    pub post: PostId,
    pub blocked_at: DateTime<Utc>,
}

/// A post joined with its owner's display name, ready for read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub trade: bool,
    pub username: String,
}

/// A photo entry as exposed in feed output. The owning-post linkage is
/// stripped by construction: only the identifier and url survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPhoto {
    pub id: PhotoId,
    pub url: String,
}

impl From<PostPhoto> for FeedPhoto {
    fn from(photo: PostPhoto) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
        }
    }
}

/// One denormalized feed record: the joined post view with its photos nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: PostId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub trade: bool,
    pub username: String,
    pub photo: Vec<FeedPhoto>,
}

impl FeedPost {
    pub fn from_view(view: PostView, photo: Vec<FeedPhoto>) -> Self {
        Self {
            id: view.id,
            title: view.title,
            price: view.price,
            description: view.description,
            trade: view.trade,
            username: view.username,
            photo,
        }
    }
}
