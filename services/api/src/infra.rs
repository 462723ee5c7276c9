use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use tradepost::marketplace::listings::domain::{
    ModeratorBlock, PersonalBlock, PhotoId, Post, PostId, PostPhoto, PostView, UserId,
};
use tradepost::marketplace::listings::repository::{
    BlockStore, NewPost, PhotoStore, PostPatch, PostStore, SchemaStore, StoreError,
};
use tradepost::marketplace::listings::service::ListingService;
use tradepost::marketplace::listings::{FieldDescriptor, FieldTypeSpec};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryListingService =
    ListingService<InMemoryPostStore, InMemoryPhotoStore, InMemoryBlockStore, InMemorySchemaStore>;

pub(crate) fn in_memory_service() -> (InMemoryListingService, Arc<InMemoryPostStore>) {
    let posts = Arc::new(InMemoryPostStore::default());
    let service = ListingService::new(
        posts.clone(),
        Arc::new(InMemoryPhotoStore::default()),
        Arc::new(InMemoryBlockStore::default()),
        Arc::new(InMemorySchemaStore::default()),
    );
    (service, posts)
}

#[derive(Default)]
pub(crate) struct InMemoryPostStore {
    sequence: AtomicI64,
    posts: Mutex<Vec<Post>>,
    usernames: Mutex<HashMap<UserId, String>>,
}

impl InMemoryPostStore {
    pub(crate) fn register_user(&self, user: UserId, username: &str) {
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

    fn to_view(&self, post: &Post) -> PostView {
        PostView {
            id: post.id,
            title: post.title.clone(),
            price: post.price,
            description: post.description.clone(),
            trade: post.trade,
            username: self.username_of(post.owner),
        }
    }
}

impl PostStore for InMemoryPostStore {
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
        Ok(guard
            .iter()
            .find(|post| post.id == id)
            .map(|post| self.to_view(post)))
    }

    fn views(&self) -> Result<Vec<PostView>, StoreError> {
        let guard = self.posts.lock().expect("post mutex poisoned");
        Ok(guard.iter().map(|post| self.to_view(post)).collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryPhotoStore {
    sequence: AtomicI64,
    photos: Mutex<Vec<PostPhoto>>,
}

impl PhotoStore for InMemoryPhotoStore {
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
pub(crate) struct InMemoryBlockStore {
    personal: Mutex<Vec<PersonalBlock>>,
    moderator: Mutex<Vec<ModeratorBlock>>,
}

impl BlockStore for InMemoryBlockStore {
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

/// Category catalog for the in-memory deployment. Real installations load
/// schemas from their category management system.
pub(crate) struct InMemorySchemaStore {
    categories: HashMap<String, Vec<FieldDescriptor>>,
}

impl Default for InMemorySchemaStore {
    fn default() -> Self {
        let mut categories = HashMap::new();
        categories.insert("apartments".to_string(), apartments_schema());
        categories.insert("generic".to_string(), Vec::new());
        Self { categories }
    }
}

impl SchemaStore for InMemorySchemaStore {
    fn fields_for(&self, category: &str) -> Result<Vec<FieldDescriptor>, StoreError> {
        self.categories
            .get(category)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

fn number_properties(kind: &str, min: i64, max: i64) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("type".to_string(), json!(kind));
    properties.insert("min".to_string(), json!(min));
    properties.insert("max".to_string(), json!(max));
    properties
}

fn values_properties(values: &[&str]) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("values".to_string(), json!(values));
    properties
}

pub(crate) fn apartments_schema() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor {
            alias: "rooms".to_string(),
            field_type: FieldTypeSpec::with_properties("number", number_properties("int", 1, 12)),
            requiring: true,
        },
        FieldDescriptor {
            alias: "area".to_string(),
            field_type: FieldTypeSpec::with_properties(
                "number",
                number_properties("float", 5, 1000),
            ),
            requiring: false,
        },
        FieldDescriptor {
            alias: "finish".to_string(),
            field_type: FieldTypeSpec::with_properties(
                "text_hint",
                values_properties(&["rough", "pre-finished", "turnkey"]),
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
                values_properties(&["parking", "balcony", "elevator"]),
            ),
            requiring: false,
        },
        FieldDescriptor {
            alias: "seller_note".to_string(),
            field_type: FieldTypeSpec::new("text"),
            requiring: false,
        },
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
