//! Block aggregation and feed assembly.

use std::collections::{HashMap, HashSet};

use super::domain::{FeedPhoto, FeedPost, PostId, PostPhoto, PostView, UserId};
use super::repository::{BlockStore, StoreError};

/// Every post id hidden from `viewer`: moderator blocks (global) concatenated
/// with the viewer's personal blocks.
///
/// The result is not deduplicated: a post blocked by both sources appears
/// twice, mirroring the block ledger. Exclusion downstream only needs
/// membership.
pub fn blocked_post_ids(blocks: &dyn BlockStore, viewer: UserId) -> Result<Vec<PostId>, StoreError> {
    let mut blocked = blocks.moderator_all()?;
    blocked.extend(blocks.personal_for(viewer)?);
    Ok(blocked)
}

/// Join post views with their photos, excluding anything in `blocked`.
///
/// Posts and photos are filtered in independent passes against the same
/// blocked set, then photos are grouped by owning post in a single indexing
/// pass before being attached. The owning-post linkage is dropped when each
/// photo becomes a [`FeedPhoto`].
pub fn assemble_feed(
    posts: Vec<PostView>,
    photos: Vec<PostPhoto>,
    blocked: &[PostId],
) -> Vec<FeedPost> {
    let blocked: HashSet<PostId> = blocked.iter().copied().collect();

    let mut photo_index: HashMap<PostId, Vec<FeedPhoto>> = HashMap::new();
    for photo in photos {
        if blocked.contains(&photo.post) {
            continue;
        }
        photo_index
            .entry(photo.post)
            .or_default()
            .push(FeedPhoto::from(photo));
    }

    posts
        .into_iter()
        .filter(|view| !blocked.contains(&view.id))
        .map(|view| {
            let attached = photo_index.remove(&view.id).unwrap_or_default();
            FeedPost::from_view(view, attached)
        })
        .collect()
}
