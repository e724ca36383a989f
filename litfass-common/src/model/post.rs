use crate::model::Id;
use crate::model::user::UserMarker;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use thiserror::Error;
use time::UtcDateTime;

/// Author name substituted when the commenting user has no display name.
pub const UNKNOWN_AUTHOR_NAME: &str = "unknown";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub name: String,
    pub caption: String,
    pub date: UtcDateTime,
    pub likes: Vec<Id<UserMarker>>,
    pub comments: Vec<Comment>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct CreatePost {
    pub name: String,
    pub caption: String,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Comment {
    pub name: String,
    pub comment: String,
}

impl Comment {
    #[must_use]
    pub fn new(author: Option<String>, body: CommentBody) -> Self {
        Self {
            name: author.unwrap_or_else(|| UNKNOWN_AUTHOR_NAME.to_owned()),
            comment: body.into_inner(),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct CommentBody(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The comment text is blank")]
pub struct BlankCommentError;

impl CommentBody {
    /// Rejects text that is empty after trimming; the accepted text is kept
    /// untrimmed.
    pub fn new(text: String) -> Result<Self, BlankCommentError> {
        if text.trim().is_empty() {
            Err(BlankCommentError)
        } else {
            Ok(CommentBody(text))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for CommentBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        CommentBody::new(inner).map_err(Error::custom)
    }
}
