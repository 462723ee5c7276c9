use serde::{Deserialize, Serialize};

use super::domain::{
    ModeratorBlock, PersonalBlock, PhotoId, Post, PostId, PostPhoto, PostView, UserId,
};
use super::fields::schema::FieldDescriptor;

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Fields of a new post; the store assigns the identifier and stamps the
/// public uuid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub trade: bool,
    pub owner: UserId,
}

/// Partial edit of an existing post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub trade: Option<bool>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.trade.is_none()
    }
}

/// Storage abstraction for posts, joined with owner identity on reads so the
/// feed and view paths stay free of user-table details.
pub trait PostStore: Send + Sync {
    fn insert(&self, post: NewPost) -> Result<Post, StoreError>;
    /// Applies the patch in place. `NotFound` when no such post exists.
    fn apply_patch(&self, id: PostId, patch: PostPatch) -> Result<Post, StoreError>;
    fn fetch(&self, id: PostId) -> Result<Option<Post>, StoreError>;
    /// The post joined with its owner's username.
    fn view(&self, id: PostId) -> Result<Option<PostView>, StoreError>;
    /// Every post joined with its owner's username, in insertion order.
    fn views(&self) -> Result<Vec<PostView>, StoreError>;
}

/// Storage abstraction for photo records. Photo bytes live elsewhere; only
/// the url is tracked here.
pub trait PhotoStore: Send + Sync {
    fn insert(&self, post: PostId, url: String) -> Result<PostPhoto, StoreError>;
    fn of_post(&self, post: PostId) -> Result<Vec<PostPhoto>, StoreError>;
    /// Every photo record across all posts, in insertion order.
    fn all(&self) -> Result<Vec<PostPhoto>, StoreError>;
    /// The url of one photo of one post. `NotFound` when either side of the
    /// pair does not match.
    fn url(&self, post: PostId, photo: PhotoId) -> Result<String, StoreError>;
}

/// Append-only ledger of personal and moderator blocks. Entries are never
/// deduplicated.
pub trait BlockStore: Send + Sync {
    fn insert_personal(&self, block: PersonalBlock) -> Result<(), StoreError>;
    fn insert_moderator(&self, block: ModeratorBlock) -> Result<(), StoreError>;
    /// Post ids blocked by the given viewer, one entry per block record.
    fn personal_for(&self, viewer: UserId) -> Result<Vec<PostId>, StoreError>;
    /// Post ids blocked by any moderator, one entry per block record.
    fn moderator_all(&self) -> Result<Vec<PostId>, StoreError>;
}

/// Source of category schemas. Supplied by the hosting application; read-only
/// to the core.
pub trait SchemaStore: Send + Sync {
    /// The additional-field declarations for a category. `NotFound` for a
    /// category this marketplace does not know.
    fn fields_for(&self, category: &str) -> Result<Vec<FieldDescriptor>, StoreError>;
}
