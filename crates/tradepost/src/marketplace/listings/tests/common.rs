use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::marketplace::listings::domain::{
    ModeratorBlock, PersonalBlock, PhotoId, Post, PostId, PostPhoto, PostView, UserId,
};
use crate::marketplace::listings::fields::schema::{
    FieldDescriptor, FieldTypeSpec, SubmittedField,
};
use crate::marketplace::listings::repository::{
    BlockStore, NewPost, PhotoStore, PostPatch, PostStore, SchemaStore, StoreError,
};
use crate::marketplace::listings::service::{ListingService, ListingSubmission};

pub(super) const DEMO_CATEGORY: &str = "apartments";

pub(super) fn number_properties(kind: &str, min: i64, max: i64) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("type".to_string(), json!(kind));
    properties.insert("min".to_string(), json!(min));
    properties.insert("max".to_string(), json!(max));
    properties
}

pub(super) fn values_properties(values: &[&str]) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("values".to_string(), json!(values));
    properties
}

pub(super) fn schema() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor {
            alias: "rooms".to_string(),
            field_type: FieldTypeSpec::with_properties("number", number_properties("int", 1, 10)),
            requiring: true,
        },
        FieldDescriptor {
            alias: "floor_note".to_string(),
            field_type: FieldTypeSpec::new("text"),
            requiring: false,
        },
        FieldDescriptor {
            alias: "finish".to_string(),
            field_type: FieldTypeSpec::with_properties(
                "text_hint",
                values_properties(&["rough", "turnkey"]),
            ),
            requiring: false,
        },
        FieldDescriptor {
            alias: "delivery".to_string(),
            field_type: FieldTypeSpec::new("yearly_quarter_hint"),
            requiring: false,
        },
        FieldDescriptor {
            alias: "amenities".to_string(),
            field_type: FieldTypeSpec::with_properties(
                "checkboxes",
                values_properties(&["parking", "balcony"]),
            ),
            requiring: false,
        },
    ]
}

pub(super) fn submission() -> ListingSubmission {
    ListingSubmission {
        owner: UserId(7),
        title: "Two-room apartment".to_string(),
        description: "Sunny side, third floor".to_string(),
        price: 85_000.0,
        trade: false,
        category: DEMO_CATEGORY.to_string(),
        additional_fields: vec![
            SubmittedField::new("rooms", json!(2)),
            SubmittedField::new("finish", json!("turnkey")),
            SubmittedField::new(
                "amenities",
                json!([{ "title": "parking" }, { "title": "balcony" }]),
            ),
        ],
    }
}

pub(super) fn build_service() -> (
    ListingService<MemoryPostStore, MemoryPhotoStore, MemoryBlockStore, MemorySchemaStore>,
    Arc<MemoryPostStore>,
    Arc<MemoryPhotoStore>,
    Arc<MemoryBlockStore>,
) {
    let posts = Arc::new(MemoryPostStore::default());
    let photos = Arc::new(MemoryPhotoStore::default());
    let blocks = Arc::new(MemoryBlockStore::default());
    let schemas = Arc::new(MemorySchemaStore::with_demo_schema());
    let service = ListingService::new(posts.clone(), photos.clone(), blocks.clone(), schemas);
    (service, posts, photos, blocks)
}

#[derive(Default)]
pub(super) struct MemoryPostStore {
    sequence: AtomicI64,
    posts: Mutex<Vec<Post>>,
    usernames: Mutex<HashMap<UserId, String>>,
}

impl MemoryPostStore {
    pub(super) fn register_user(&self, user: UserId, username: &str) {
        self.usernames
            .lock()
            .expect("username mutex poisoned")
            .insert(user, username.to_string());
    }

    fn username_of(&self, user: UserId) -> String {
        self.usernames
            .lock()
            .expect("username mutex poisoned")
            .get(&user)
            .cloned()
            .unwrap_or_else(|| format!("user-{}", user.0))
    }
}

impl PostStore for MemoryPostStore {
    fn insert(&self, post: NewPost) -> Result<Post, StoreError> {
        let id = PostId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = Post {
            id,
            uuid: Uuid::new_v4(),
            title: post.title,
            description: post.description,
            price: post.price,
            trade: post.trade,
            owner: post.owner,
        };
        self.posts
            .lock()
            .expect("post mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn apply_patch(&self, id: PostId, patch: PostPatch) -> Result<Post, StoreError> {
        let mut guard = self.posts.lock().expect("post mutex poisoned");
        let post = guard
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(description) = patch.description {
            post.description = description;
        }
        if let Some(price) = patch.price {
            post.price = price;
        }
        if let Some(trade) = patch.trade {
            post.trade = trade;
        }
        Ok(post.clone())
    }

    fn fetch(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let guard = self.posts.lock().expect("post mutex poisoned");
        Ok(guard.iter().find(|post| post.id == id).cloned())
    }

    fn view(&self, id: PostId) -> Result<Option<PostView>, StoreError> {
        let guard = self.posts.lock().expect("post mutex poisoned");
        Ok(guard.iter().find(|post| post.id == id).map(|post| PostView {
            id: post.id,
            title: post.title.clone(),
            price: post.price,
            description: post.description.clone(),
            trade: post.trade,
            username: self.username_of(post.owner),
        }))
    }

    fn views(&self) -> Result<Vec<PostView>, StoreError> {
        let guard = self.posts.lock().expect("post mutex poisoned");
        Ok(guard
            .iter()
            .map(|post| PostView {
                id: post.id,
                title: post.title.clone(),
                price: post.price,
                description: post.description.clone(),
                trade: post.trade,
                username: self.username_of(post.owner),
            })
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryPhotoStore {
    sequence: AtomicI64,
    photos: Mutex<Vec<PostPhoto>>,
}

impl PhotoStore for MemoryPhotoStore {
    fn insert(&self, post: PostId, url: String) -> Result<PostPhoto, StoreError> {
        let id = PhotoId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let photo = PostPhoto { id, post, url };
        self.photos
            .lock()
            .expect("photo mutex poisoned")
            .push(photo.clone());
        Ok(photo)
    }

    fn of_post(&self, post: PostId) -> Result<Vec<PostPhoto>, StoreError> {
        let guard = self.photos.lock().expect("photo mutex poisoned");
        Ok(guard
            .iter()
            .filter(|photo| photo.post == post)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<PostPhoto>, StoreError> {
        Ok(self.photos.lock().expect("photo mutex poisoned").clone())
    }

    fn url(&self, post: PostId, photo: PhotoId) -> Result<String, StoreError> {
        let guard = self.photos.lock().expect("photo mutex poisoned");
        guard
            .iter()
            .find(|record| record.post == post && record.id == photo)
            .map(|record| record.url.clone())
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryBlockStore {
    personal: Mutex<Vec<PersonalBlock>>,
    moderator: Mutex<Vec<ModeratorBlock>>,
}

impl BlockStore for MemoryBlockStore {
    fn insert_personal(&self, block: PersonalBlock) -> Result<(), StoreError> {
        self.personal
            .lock()
            .expect("block mutex poisoned")
            .push(block);
        Ok(())
    }

    fn insert_moderator(&self, block: ModeratorBlock) -> Result<(), StoreError> {
        self.moderator
            .lock()
            .expect("block mutex poisoned")
            .push(block);
        Ok(())
    }

    fn personal_for(&self, viewer: UserId) -> Result<Vec<PostId>, StoreError> {
        let guard = self.personal.lock().expect("block mutex poisoned");
        Ok(guard
            .iter()
            .filter(|block| block.viewer == viewer)
            .map(|block| block.post)
            .collect())
    }

    fn moderator_all(&self) -> Result<Vec<PostId>, StoreError> {
        let guard = self.moderator.lock().expect("block mutex poisoned");
        Ok(guard.iter().map(|block| block.post).collect())
    }
}

pub(super) struct MemorySchemaStore {
    categories: HashMap<String, Vec<FieldDescriptor>>,
}

impl MemorySchemaStore {
    pub(super) fn with_demo_schema() -> Self {
        let mut categories = HashMap::new();
        categories.insert(DEMO_CATEGORY.to_string(), schema());
        Self { categories }
    }
}

impl SchemaStore for MemorySchemaStore {
    fn fields_for(&self, category: &str) -> Result<Vec<FieldDescriptor>, StoreError> {
        self.categories
            .get(category)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

pub(super) struct UnavailablePostStore;

impl PostStore for UnavailablePostStore {
    fn insert(&self, _post: NewPost) -> Result<Post, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn apply_patch(&self, _id: PostId, _patch: PostPatch) -> Result<Post, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: PostId) -> Result<Option<Post>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn view(&self, _id: PostId) -> Result<Option<PostView>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn views(&self) -> Result<Vec<PostView>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
