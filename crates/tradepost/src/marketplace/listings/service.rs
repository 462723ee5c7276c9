use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{
    FeedPhoto, FeedPost, ModeratorBlock, PersonalBlock, PhotoId, Post, PostId, PostPhoto, UserId,
};
use super::feed::{assemble_feed, blocked_post_ids};
use super::fields::schema::SubmittedField;
use super::fields::{
    has_duplicate_aliases, missing_required_aliases, AdditionalFieldsValidator, ValidationError,
};
use super::repository::{
    BlockStore, NewPost, PhotoStore, PostPatch, PostStore, SchemaStore, StoreError,
};

/// A new listing as submitted by a user, additional fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSubmission {
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub trade: bool,
    pub category: String,
    #[serde(default)]
    pub additional_fields: Vec<SubmittedField>,
}

/// Combined result of the three independent submission checks. A submission
/// is stored only when all three come back clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub missing_required: Vec<String>,
    pub duplicate_aliases: bool,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.missing_required.is_empty() && !self.duplicate_aliases
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("listing submission rejected")]
    Rejected(ValidationReport),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service composing the field validator with the post, photo, block, and
/// schema stores.
pub struct ListingService<P, H, B, S> {
    posts: Arc<P>,
    photos: Arc<H>,
    blocks: Arc<B>,
    schemas: Arc<S>,
    validator: Arc<AdditionalFieldsValidator>,
}

impl<P, H, B, S> ListingService<P, H, B, S>
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    pub fn new(posts: Arc<P>, photos: Arc<H>, blocks: Arc<B>, schemas: Arc<S>) -> Self {
        Self::with_validator(posts, photos, blocks, schemas, AdditionalFieldsValidator::default())
    }

    pub fn with_validator(
        posts: Arc<P>,
        photos: Arc<H>,
        blocks: Arc<B>,
        schemas: Arc<S>,
        validator: AdditionalFieldsValidator,
    ) -> Self {
        Self {
            posts,
            photos,
            blocks,
            schemas,
            validator: Arc::new(validator),
        }
    }

    /// Check a submission's additional fields against its category schema
    /// without storing anything. All three checks run regardless of earlier
    /// failures.
    pub fn check_submission(
        &self,
        submission: &ListingSubmission,
    ) -> Result<ValidationReport, ListingServiceError> {
        let schema = self.schemas.fields_for(&submission.category)?;

        Ok(ValidationReport {
            errors: self
                .validator
                .validate(&submission.additional_fields, &schema),
            missing_required: missing_required_aliases(&submission.additional_fields, &schema),
            duplicate_aliases: has_duplicate_aliases(&submission.additional_fields),
        })
    }

    /// Validate and store a new listing.
    pub fn submit(&self, submission: ListingSubmission) -> Result<Post, ListingServiceError> {
        let report = self.check_submission(&submission)?;
        if !report.is_clean() {
            return Err(ListingServiceError::Rejected(report));
        }

        let post = self.posts.insert(NewPost {
            title: submission.title,
            description: submission.description,
            price: submission.price,
            trade: submission.trade,
            owner: submission.owner,
        })?;
        Ok(post)
    }

    /// Apply a partial edit to an existing listing. An empty patch leaves the
    /// post untouched and returns it as stored.
    pub fn edit(&self, id: PostId, patch: PostPatch) -> Result<Post, ListingServiceError> {
        if patch.is_empty() {
            let post = self.posts.fetch(id)?.ok_or(StoreError::NotFound)?;
            return Ok(post);
        }
        Ok(self.posts.apply_patch(id, patch)?)
    }

    /// One listing joined with its owner's username and photos, regardless of
    /// blocks. `None` when the post does not exist.
    pub fn listing(&self, id: PostId) -> Result<Option<FeedPost>, ListingServiceError> {
        let Some(view) = self.posts.view(id)? else {
            return Ok(None);
        };
        let photos = self.listing_photos(id)?;
        Ok(Some(FeedPost::from_view(view, photos)))
    }

    /// The photo entries of one post, owning-post linkage stripped.
    pub fn listing_photos(&self, post: PostId) -> Result<Vec<FeedPhoto>, ListingServiceError> {
        Ok(self
            .photos
            .of_post(post)?
            .into_iter()
            .map(FeedPhoto::from)
            .collect())
    }

    /// Attach a photo record to an existing listing.
    pub fn attach_photo(&self, post: PostId, url: String) -> Result<PostPhoto, ListingServiceError> {
        if self.posts.fetch(post)?.is_none() {
            return Err(StoreError::NotFound.into());
        }
        Ok(self.photos.insert(post, url)?)
    }

    /// The stored url of one photo of one post.
    pub fn photo_url(&self, post: PostId, photo: PhotoId) -> Result<String, ListingServiceError> {
        Ok(self.photos.url(post, photo)?)
    }

    /// Hide a post from one viewer.
    pub fn block_for_viewer(&self, viewer: UserId, post: PostId) -> Result<(), ListingServiceError> {
        Ok(self.blocks.insert_personal(PersonalBlock {
            viewer,
            post,
            blocked_at: Utc::now(),
        })?)
    }

    /// Hide a post from every viewer.
    pub fn block_by_moderator(
        &self,
        moderator: UserId,
        post: PostId,
    ) -> Result<(), ListingServiceError> {
        Ok(self.blocks.insert_moderator(ModeratorBlock {
            moderator,
            post,
            blocked_at: Utc::now(),
        })?)
    }

    /// The denormalized feed for one viewer: every non-blocked post with its
    /// non-blocked photos nested.
    pub fn feed(&self, viewer: UserId) -> Result<Vec<FeedPost>, ListingServiceError> {
        let blocked = blocked_post_ids(self.blocks.as_ref(), viewer)?;
        let posts = self.posts.views()?;
        let photos = self.photos.all()?;
        Ok(assemble_feed(posts, photos, &blocked))
    }
}
