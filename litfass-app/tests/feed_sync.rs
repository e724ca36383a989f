mod support;

use litfass_app::feed::FeedSync;
use litfass_app::identity::SessionIdentity;
use litfass_app::mutate::PostMutator;
use litfass_common::model::Id;
use litfass_common::model::post::CreatePost;
use litfass_common::model::user::Viewer;
use litfass_store::client::{DocumentStore, SubscriptionError};
use litfass_store::document::Document;
use litfass_store::memory::MemoryStore;
use serde_json::json;
use std::sync::Arc;

fn create(name: &str) -> CreatePost {
    CreatePost {
        name: name.to_owned(),
        caption: String::new(),
    }
}

fn viewer(id: &str) -> Viewer {
    Viewer {
        id: Id::from(id),
        display_name: None,
    }
}

#[tokio::test]
async fn rendered_list_reflects_exactly_the_latest_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(SessionIdentity::new());
    let feed = FeedSync::new(Arc::clone(&store), identity);

    let (handler, mut updates) = support::update_channel();
    let subscription = feed.subscribe(handler);

    assert!(support::recv_update(&mut updates).await.is_empty());

    let first = store.create_post(create("first")).await.unwrap();
    let second = store.create_post(create("second")).await.unwrap();

    let posts = support::recv_until(&mut updates, |posts| posts.len() == 2).await;
    let ids: Vec<_> = posts.iter().map(|post| post.id.clone()).collect();
    assert_eq!(ids, vec![second.clone(), first.clone()]);

    store.delete_post(&second).await.unwrap();

    let posts = support::recv_until(&mut updates, |posts| posts.len() == 1).await;
    assert_eq!(posts[0].id, first);

    subscription.unsubscribe().await;
}

#[tokio::test]
async fn is_liked_uses_the_identity_current_at_each_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(SessionIdentity::new());
    let alice = viewer("user-alice");
    identity.sign_in(alice.clone());

    let post_id = store.create_post(create("post")).await.unwrap();
    let mutator = PostMutator::new(Arc::clone(&store));
    mutator
        .toggle_like(post_id.clone(), alice.id.clone(), false)
        .await
        .unwrap();

    let feed = FeedSync::new(Arc::clone(&store), Arc::clone(&identity));
    let (handler, mut updates) = support::update_channel();
    let subscription = feed.subscribe(handler);

    let posts = support::recv_until(&mut updates, |posts| {
        posts.iter().any(|post| post.id == post_id && post.is_liked)
    })
    .await;
    assert!(posts[0].is_liked);

    // Signing out alone triggers no snapshot; the next remote change must
    // re-derive with the now-absent identity.
    identity.sign_out();
    store.create_post(create("trigger")).await.unwrap();

    let posts = support::recv_until(&mut updates, |posts| posts.len() == 2).await;
    let original = posts.iter().find(|post| post.id == post_id).unwrap();
    assert!(!original.is_liked);
    assert_eq!(original.likes, vec![alice.id]);

    subscription.unsubscribe().await;
}

#[tokio::test]
async fn unsubscribing_stops_delivery_for_good() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(SessionIdentity::new());
    let feed = FeedSync::new(Arc::clone(&store), identity);

    let (handler, mut updates) = support::update_channel();
    let subscription = feed.subscribe(handler);

    assert!(support::recv_update(&mut updates).await.is_empty());

    subscription.unsubscribe().await;

    // The handler died with the task, so the channel drains to None and
    // nothing can reflect this change.
    store.create_post(create("after")).await.unwrap();
    while let Some(update) = updates.recv().await {
        assert!(update.is_empty());
    }
}

#[tokio::test]
async fn subscription_error_keeps_the_last_delivered_list() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(SessionIdentity::new());
    store.create_post(create("first")).await.unwrap();

    let feed = FeedSync::new(Arc::clone(&store), identity);
    let (handler, mut updates) = support::update_channel();
    let subscription = feed.subscribe(handler);

    support::recv_until(&mut updates, |posts| posts.len() == 1).await;

    store.publish_error(SubscriptionError::Transport("socket closed".to_owned()));
    store.create_post(create("second")).await.unwrap();

    // The error produces no update; everything delivered from here on
    // reflects a full, coherent snapshot.
    let posts = support::recv_until(&mut updates, |posts| posts.len() == 2).await;
    assert_eq!(posts.len(), 2);

    subscription.unsubscribe().await;
}

#[tokio::test]
async fn undecodable_documents_are_skipped_not_fatal() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(SessionIdentity::new());

    store
        .insert_document(Document {
            id: Id::from("post-broken"),
            fields: json!({ "name": "no date" }).as_object().cloned().unwrap(),
        })
        .await;
    let good = store.create_post(create("good")).await.unwrap();

    let feed = FeedSync::new(Arc::clone(&store), identity);
    let (handler, mut updates) = support::update_channel();
    let subscription = feed.subscribe(handler);

    let posts = support::recv_until(&mut updates, |posts| !posts.is_empty()).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, good);

    subscription.unsubscribe().await;
}
