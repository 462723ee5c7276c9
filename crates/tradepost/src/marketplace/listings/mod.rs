//! Marketplace listings: submission validation, moderation blocks, and the
//! block-filtered feed.
//!
//! Categories declare their additional fields at runtime; the `fields` module
//! validates submissions against those declarations. The `feed` module joins
//! posts with their photos while excluding anything hidden by a personal or
//! moderator block.

pub mod domain;
pub mod feed;
pub mod fields;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    FeedPhoto, FeedPost, ModeratorBlock, PersonalBlock, PhotoId, Post, PostId, PostPhoto,
    PostView, UserId,
};
pub use fields::{
    has_duplicate_aliases, missing_required_aliases, AdditionalFieldsValidator, ValidationError,
};
pub use fields::schema::{FieldDescriptor, FieldTypeSpec, SubmittedField};
pub use repository::{
    BlockStore, NewPost, PhotoStore, PostPatch, PostStore, SchemaStore, StoreError,
};
pub use router::listing_router;
pub use service::{ListingService, ListingServiceError, ListingSubmission, ValidationReport};
