use litfass_app::feed::FeedSync;
use litfass_app::identity::{IdentityProvider, SessionIdentity};
use litfass_app::mutate::{MutationError, PostMutator};
use litfass_common::model::Id;
use litfass_common::model::post::CreatePost;
use litfass_common::model::user::Viewer;
use litfass_common::model::view::PostView;
use litfass_store::client::{DocumentStore, StoreError};
use litfass_store::memory::MemoryStore;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error talking to the store: {0}")]
    Store(#[from] StoreError),
    #[error("Error updating a post: {0}")]
    Mutation(#[from] MutationError),
    #[error("The feed ended before delivering a snapshot")]
    FeedClosed,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    viewer_id: Option<String>,
    viewer_name: Option<String>,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "litfass_app=debug,litfass_store=debug,litfass_common=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn next_update(
    updates: &mut mpsc::UnboundedReceiver<Vec<PostView>>,
) -> Result<Vec<PostView>, InitError> {
    updates.recv().await.ok_or(InitError::FeedClosed)
}

/// Walks one feed session against the in-memory store: subscribe, compose a
/// post, like it, comment on it, unsubscribe.
#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let viewer = Viewer {
        id: Id::new(env.viewer_id.unwrap_or_else(|| "demo-viewer".to_owned())),
        display_name: env.viewer_name,
    };

    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(SessionIdentity::new());
    identity.sign_in(viewer.clone());

    let feed = FeedSync::new(Arc::clone(&store), Arc::clone(&identity));
    let (update_sender, mut updates) = mpsc::unbounded_channel();
    let subscription = feed.subscribe(move |posts| {
        let _ = update_sender.send(posts);
    });

    let initial = next_update(&mut updates).await?;
    info!(posts = initial.len(), "Feed is live");

    let post_id = store
        .create_post(CreatePost {
            name: viewer.display_name.clone().unwrap_or_else(|| "demo".to_owned()),
            caption: "First post from the demo session".to_owned(),
        })
        .await?;
    info!(%post_id, "Composed a post");

    let mutator = PostMutator::new(Arc::clone(&store));

    mutator
        .toggle_like(post_id.clone(), viewer.id.clone(), false)
        .await?;
    let posts = loop {
        let posts = next_update(&mut updates).await?;
        if posts.iter().any(|post| post.id == post_id && post.is_liked) {
            break posts;
        }
    };
    info!(likes = posts[0].like_count(), "Like landed");

    mutator
        .add_comment(
            post_id.clone(),
            identity.current_display_name(),
            "Hello from the demo".to_owned(),
        )
        .await?;
    loop {
        let posts = next_update(&mut updates).await?;
        if let Some(post) = posts.iter().find(|post| post.id == post_id) {
            if let Some(comment) = post.comments.last() {
                info!(
                    author = %comment.name,
                    text = %comment.comment,
                    date = %post.date_label(),
                    "Comment landed"
                );
                break;
            }
        }
    }

    subscription.unsubscribe().await;
    info!("Feed closed");

    Ok(())
}
