#![allow(dead_code)]

use async_trait::async_trait;
use litfass_common::model::Id;
use litfass_common::model::post::{CreatePost, Post, PostMarker};
use litfass_common::model::view::PostView;
use litfass_store::client::{DocumentStore, StoreError, SubscriptionError};
use litfass_store::document::Snapshot;
use litfass_store::patch::FieldPatch;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Handler that forwards every update into a channel the test can await.
pub fn update_channel() -> (
    impl FnMut(Vec<PostView>) + Send + 'static,
    mpsc::UnboundedReceiver<Vec<PostView>>,
) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let handler = move |posts| {
        let _ = sender.send(posts);
    };
    (handler, receiver)
}

pub async fn recv_update(updates: &mut mpsc::UnboundedReceiver<Vec<PostView>>) -> Vec<PostView> {
    timeout(RECV_TIMEOUT, updates.recv())
        .await
        .expect("Timed out waiting for a feed update")
        .expect("The feed handler was dropped")
}

/// Receives updates until one matches. Snapshot delivery may coalesce, so
/// tests must never count intermediate updates.
pub async fn recv_until(
    updates: &mut mpsc::UnboundedReceiver<Vec<PostView>>,
    matches: impl Fn(&[PostView]) -> bool,
) -> Vec<PostView> {
    loop {
        let update = recv_update(updates).await;
        if matches(&update) {
            return update;
        }
    }
}

/// Store that refuses every operation, standing in for a remote store the
/// caller has no rights on.
pub struct DenyingStore {
    snapshots: watch::Sender<Result<Snapshot, SubscriptionError>>,
}

impl DenyingStore {
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(Ok(Snapshot::default()));
        Self { snapshots }
    }
}

#[async_trait]
impl DocumentStore for DenyingStore {
    fn watch_posts(&self) -> watch::Receiver<Result<Snapshot, SubscriptionError>> {
        self.snapshots.subscribe()
    }

    async fn fetch_post(&self, _post_id: Id<PostMarker>) -> Result<Option<Post>, StoreError> {
        Err(StoreError::PermissionDenied)
    }

    async fn create_post(&self, _post: CreatePost) -> Result<Id<PostMarker>, StoreError> {
        Err(StoreError::PermissionDenied)
    }

    async fn patch_post(
        &self,
        _post_id: Id<PostMarker>,
        _patch: FieldPatch,
    ) -> Result<(), StoreError> {
        Err(StoreError::PermissionDenied)
    }
}
