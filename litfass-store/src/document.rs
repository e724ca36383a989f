use litfass_common::model::Id;
use litfass_common::model::post::PostMarker;
use serde_json::Value;

/// String-keyed field map of a stored document, shaped like the remote
/// store's raw records.
pub type FieldMap = serde_json::Map<String, Value>;

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Document {
    pub id: Id<PostMarker>,
    pub fields: FieldMap,
}

/// One consistent, already-ordered point-in-time view of the posts
/// collection.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}
