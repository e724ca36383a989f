use crate::client::{DocumentStore, Result, StoreError, SubscriptionError};
use crate::document::{Document, Snapshot};
use crate::patch::FieldPatch;
use crate::record;
use async_trait::async_trait;
use litfass_common::model::Id;
use litfass_common::model::post::{CreatePost, Post, PostMarker};
use serde_json::Value;
use time::{Duration, UtcDateTime};
use tokio::sync::{Mutex, watch};
use tracing::debug;

/// In-process posts collection with the remote store's semantics: atomic
/// field patches and a live snapshot feed. Backs the demo binary and stands
/// in for the remote store in tests.
pub struct MemoryStore {
    state: Mutex<State>,
    snapshots: watch::Sender<Result<Snapshot, SubscriptionError>>,
}

#[derive(Default)]
struct State {
    documents: Vec<Document>,
    next_post_number: u64,
    last_date: Option<UtcDateTime>,
}

impl State {
    /// Creation dates come from the wall clock but are forced strictly
    /// increasing, so snapshot order is deterministic under rapid creation.
    fn stamp(&mut self) -> UtcDateTime {
        let mut date = UtcDateTime::now();

        if let Some(last) = self.last_date {
            if date <= last {
                date = last + Duration::microseconds(1);
            }
        }

        self.last_date = Some(date);
        date
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(Ok(Snapshot::default()));

        Self {
            state: Mutex::new(State::default()),
            snapshots,
        }
    }

    /// Inserts a raw document, bypassing the posts schema. Lets tests plant
    /// malformed documents and custom dates.
    pub async fn insert_document(&self, document: Document) {
        let mut state = self.state.lock().await;
        state.documents.push(document);
        self.publish(&state);
    }

    pub async fn delete_post(&self, post_id: &Id<PostMarker>) -> Result<()> {
        let mut state = self.state.lock().await;

        let count_before = state.documents.len();
        state.documents.retain(|document| document.id != *post_id);
        if state.documents.len() == count_before {
            return Err(StoreError::NotFound(post_id.clone()));
        }

        self.publish(&state);
        Ok(())
    }

    /// Pushes a live-query failure to all subscribers, as a failing
    /// transport would.
    pub fn publish_error(&self, error: SubscriptionError) {
        self.snapshots.send_replace(Err(error));
    }

    fn publish(&self, state: &State) {
        let snapshot = ordered_snapshot(&state.documents);
        debug!(posts = snapshot.documents.len(), "Publishing posts snapshot");
        self.snapshots.send_replace(Ok(snapshot));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn watch_posts(&self) -> watch::Receiver<Result<Snapshot, SubscriptionError>> {
        self.snapshots.subscribe()
    }

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let state = self.state.lock().await;

        let document = state
            .documents
            .iter()
            .find(|document| document.id == post_id);

        let post = document.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn create_post(&self, post: CreatePost) -> Result<Id<PostMarker>> {
        let mut state = self.state.lock().await;

        state.next_post_number += 1;
        let post_id = Id::new(format!("post-{:06}", state.next_post_number));
        let date = state.stamp();

        state.documents.push(Document {
            id: post_id.clone(),
            fields: record::new_post_fields(&post, date),
        });

        self.publish(&state);
        Ok(post_id)
    }

    async fn patch_post(&self, post_id: Id<PostMarker>, patch: FieldPatch) -> Result<()> {
        let mut state = self.state.lock().await;

        let document = state
            .documents
            .iter_mut()
            .find(|document| document.id == post_id)
            .ok_or(StoreError::NotFound(post_id))?;

        patch.apply(&mut document.fields);

        self.publish(&state);
        Ok(())
    }
}

/// Date descending, ties broken by id descending. Stable and deterministic
/// per snapshot.
fn ordered_snapshot(documents: &[Document]) -> Snapshot {
    let mut documents = documents.to_vec();
    documents.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));

    Snapshot { documents }
}

fn sort_key(document: &Document) -> (i64, &str) {
    let date = document
        .fields
        .get(record::FIELD_DATE)
        .and_then(Value::as_i64)
        .unwrap_or(i64::MIN);

    (date, document.id.get())
}
