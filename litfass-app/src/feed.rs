use crate::identity::IdentityProvider;
use litfass_common::model::post::Post;
use litfass_common::model::view::PostView;
use litfass_store::client::DocumentStore;
use litfass_store::document::Snapshot;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, warn};

/// Live view over the posts collection. Every snapshot the store delivers is
/// re-derived into the complete ordered list of [`PostView`]s and handed to
/// the subscriber's handler, never a diff: the handler is always consistent
/// with exactly one snapshot.
pub struct FeedSync<S, I> {
    store: Arc<S>,
    identity: Arc<I>,
}

impl<S, I> FeedSync<S, I>
where
    S: DocumentStore,
    I: IdentityProvider + 'static,
{
    #[must_use]
    pub fn new(store: Arc<S>, identity: Arc<I>) -> Self {
        Self { store, identity }
    }

    /// Spawns the forwarding task. The initial snapshot is delivered as the
    /// first update; all `on_update` calls are serialized by the task.
    pub fn subscribe(
        &self,
        mut on_update: impl FnMut(Vec<PostView>) + Send + 'static,
    ) -> FeedSubscription {
        let mut snapshots = self.store.watch_posts();
        let identity = Arc::clone(&self.identity);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            loop {
                let current = snapshots.borrow_and_update().clone();
                match current {
                    Ok(snapshot) => on_update(render(&snapshot, identity.as_ref())),
                    Err(error) => {
                        error!(%error, "Live query failed, keeping the last delivered list");
                    }
                }

                tokio::select! {
                    biased;
                    () = task_cancel.cancelled() => break,
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            warn!("Snapshot channel closed, ending feed delivery");
                            break;
                        }
                    }
                }
            }
        });

        FeedSubscription {
            cancel: cancel.clone(),
            _cancel_on_drop: cancel.drop_guard(),
            task,
        }
    }
}

/// Consuming the handle on unsubscribe makes double-unsubscribe
/// unrepresentable. Dropping it without unsubscribing cancels delivery
/// best-effort.
pub struct FeedSubscription {
    cancel: CancellationToken,
    _cancel_on_drop: DropGuard,
    task: JoinHandle<()>,
}

impl FeedSubscription {
    /// Once this returns, no further `on_update` call happens: the
    /// forwarding task has ended and the handler is dropped.
    pub async fn unsubscribe(self) {
        self.cancel.cancel();
        if let Err(error) = self.task.await {
            warn!(%error, "Feed forwarding task failed");
        }
    }
}

/// `is_liked` uses whatever identity is current at this snapshot. A document
/// that fails the posts schema was never a valid post and is skipped; it must
/// not blank the rest of the feed.
fn render(snapshot: &Snapshot, identity: &impl IdentityProvider) -> Vec<PostView> {
    let viewer = identity.current_user_id();

    let views: Vec<_> = snapshot
        .documents
        .iter()
        .filter_map(|document| match Post::try_from(document) {
            Ok(post) => Some(PostView::derive(post, viewer.as_ref())),
            Err(error) => {
                warn!(post_id = %document.id, %error, "Skipping undecodable post document");
                None
            }
        })
        .collect();

    debug!(posts = views.len(), "Rendered feed snapshot");
    views
}
