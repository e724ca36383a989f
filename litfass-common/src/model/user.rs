use crate::model::Id;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

/// The authenticated user a feed is rendered for.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct Viewer {
    pub id: Id<UserMarker>,
    pub display_name: Option<String>,
}
