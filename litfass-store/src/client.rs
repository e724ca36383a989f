use crate::document::Snapshot;
use crate::patch::FieldPatch;
use crate::record::RecordError;
use async_trait::async_trait;
use litfass_common::model::Id;
use litfass_common::model::post::{CreatePost, Post, PostMarker};
use thiserror::Error;
use tokio::sync::watch;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("An object in the store was invalid: {0}")]
    Data(#[from] RecordError),
    #[error("Post with id {0} was not found.")]
    NotFound(Id<PostMarker>),
    #[error("The caller may not touch this document.")]
    PermissionDenied,
    #[error("The store is unreachable: {0}")]
    Unavailable(String),
}

/// Failure of the live query itself. Travels inside the watch payload, so it
/// is `Clone`.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum SubscriptionError {
    #[error("The live query lost its transport: {0}")]
    Transport(String),
    #[error("The live query is not authenticated")]
    Unauthenticated,
}

/// The remote document store holding the posts collection.
///
/// `watch_posts` is the live-query seam: the receiver always holds the most
/// recent snapshot, older snapshots are never observed after newer ones, and
/// intermediate snapshots may be coalesced away. The async methods are
/// single-shot request/response operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn watch_posts(&self) -> watch::Receiver<Result<Snapshot, SubscriptionError>>;

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>>;

    async fn create_post(&self, post: CreatePost) -> Result<Id<PostMarker>>;

    async fn patch_post(&self, post_id: Id<PostMarker>, patch: FieldPatch) -> Result<()>;
}
