use crate::model::Id;
use crate::model::post::{Comment, Post, PostMarker};
use crate::model::user::UserMarker;
use time::UtcDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Presentation copy of a [`Post`], rebuilt from scratch on every snapshot.
/// Never persisted.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostView {
    pub id: Id<PostMarker>,
    pub name: String,
    pub caption: String,
    pub date: UtcDateTime,
    pub likes: Vec<Id<UserMarker>>,
    pub comments: Vec<Comment>,
    pub is_liked: bool,
}

impl PostView {
    /// `is_liked` is membership of the viewer in `likes`; an unauthenticated
    /// viewer sees every post as not liked.
    #[must_use]
    pub fn derive(post: Post, viewer: Option<&Id<UserMarker>>) -> Self {
        let is_liked = viewer.is_some_and(|viewer| post.likes.contains(viewer));

        Self {
            id: post.id,
            name: post.name,
            caption: post.caption,
            date: post.date,
            likes: post.likes,
            comments: post.comments,
            is_liked,
        }
    }

    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    #[must_use]
    pub fn date_label(&self) -> String {
        self.date
            .format(DATE_LABEL_FORMAT)
            .expect("The date label format covers only date and time components.")
    }
}
