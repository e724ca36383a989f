use litfass_common::model::Id;
use litfass_common::model::post::{BlankCommentError, Comment, CommentBody, PostMarker};
use litfass_common::model::user::UserMarker;
use litfass_store::client::{DocumentStore, StoreError};
use litfass_store::record;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T, E = MutationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("The comment was rejected before sending: {0}")]
    Validation(#[from] BlankCommentError),
    #[error("The store rejected the update: {0}")]
    Remote(#[from] StoreError),
}

/// Issues atomic field patches against single posts. No local state, no
/// optimistic update: the rendered list changes only through the next
/// snapshot, never through a mutation's own completion.
pub struct PostMutator<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> PostMutator<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Adds or removes the viewer from the post's like set, depending on the
    /// liked state the caller currently renders.
    pub async fn toggle_like(
        &self,
        post_id: Id<PostMarker>,
        viewer: Id<UserMarker>,
        currently_liked: bool,
    ) -> Result<()> {
        let patch = if currently_liked {
            record::unlike_patch(&viewer)
        } else {
            record::like_patch(&viewer)
        };

        self.store.patch_post(post_id, patch).await?;
        Ok(())
    }

    /// Appends a comment to the post. Blank text is rejected before any
    /// store call; a missing author name falls back to the fixed
    /// placeholder.
    pub async fn add_comment(
        &self,
        post_id: Id<PostMarker>,
        author: Option<String>,
        text: String,
    ) -> Result<()> {
        let body = CommentBody::new(text)?;
        let comment = Comment::new(author, body);

        self.store
            .patch_post(post_id, record::comment_patch(&comment))
            .await?;
        Ok(())
    }
}
