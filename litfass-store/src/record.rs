use crate::document::{Document, FieldMap};
use crate::patch::FieldPatch;
use litfass_common::model::Id;
use litfass_common::model::post::{Comment, CreatePost, Post};
use litfass_common::model::user::UserMarker;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::UtcDateTime;

pub const POSTS_COLLECTION: &str = "posts";

pub const FIELD_NAME: &str = "name";
pub const FIELD_CAPTION: &str = "caption";
pub const FIELD_DATE: &str = "date";
pub const FIELD_LIKES: &str = "likes";
pub const FIELD_COMMENTS: &str = "comments";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("The document does not match the posts schema: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("The creation date is out of range: {0}")]
    Date(#[from] time::error::ComponentRange),
}

/// The posts schema, applied exactly once at the store boundary. A document
/// must carry a decodable `date`; every other field falls back to its empty
/// default.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct PostRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub caption: String,
    pub date: i64,
    #[serde(default)]
    pub likes: Vec<Id<UserMarker>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl TryFrom<&Document> for Post {
    type Error = RecordError;

    fn try_from(document: &Document) -> Result<Self, Self::Error> {
        let record: PostRecord =
            serde_json::from_value(Value::Object(document.fields.clone()))?;

        Ok(Self {
            id: document.id.clone(),
            name: record.name,
            caption: record.caption,
            date: date_from_micros(record.date)?,
            likes: record.likes,
            comments: record.comments,
        })
    }
}

/// Dates are stored as epoch microseconds.
pub fn date_from_micros(micros: i64) -> Result<UtcDateTime, time::error::ComponentRange> {
    UtcDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn micros_from_date(date: UtcDateTime) -> i64 {
    (date.unix_timestamp_nanos() / 1_000) as i64
}

#[must_use]
pub fn new_post_fields(post: &CreatePost, date: UtcDateTime) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(FIELD_NAME.to_owned(), Value::String(post.name.clone()));
    fields.insert(
        FIELD_CAPTION.to_owned(),
        Value::String(post.caption.clone()),
    );
    fields.insert(FIELD_DATE.to_owned(), Value::from(micros_from_date(date)));
    fields.insert(FIELD_LIKES.to_owned(), Value::Array(Vec::new()));
    fields.insert(FIELD_COMMENTS.to_owned(), Value::Array(Vec::new()));
    fields
}

#[must_use]
pub fn like_patch(viewer: &Id<UserMarker>) -> FieldPatch {
    FieldPatch::ArrayUnion {
        field: FIELD_LIKES.to_owned(),
        elements: vec![Value::String(viewer.get().to_owned())],
    }
}

#[must_use]
pub fn unlike_patch(viewer: &Id<UserMarker>) -> FieldPatch {
    FieldPatch::ArrayRemove {
        field: FIELD_LIKES.to_owned(),
        elements: vec![Value::String(viewer.get().to_owned())],
    }
}

#[must_use]
pub fn comment_patch(comment: &Comment) -> FieldPatch {
    let mut entry = FieldMap::new();
    entry.insert(FIELD_NAME.to_owned(), Value::String(comment.name.clone()));
    entry.insert(
        "comment".to_owned(),
        Value::String(comment.comment.clone()),
    );

    FieldPatch::ArrayAppend {
        field: FIELD_COMMENTS.to_owned(),
        elements: vec![Value::Object(entry)],
    }
}
