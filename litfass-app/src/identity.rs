use litfass_common::model::Id;
use litfass_common::model::user::{UserMarker, Viewer};
use std::sync::RwLock;

/// Read-only view of the process-wide authenticated viewer, queried
/// synchronously at point of use. The identity may change between snapshots,
/// so callers must never cache what they read here.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<Id<UserMarker>>;

    fn current_display_name(&self) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct SessionIdentity {
    viewer: RwLock<Option<Viewer>>,
}

impl SessionIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, viewer: Viewer) {
        *self.viewer.write().expect("The identity lock is never poisoned.") = Some(viewer);
    }

    pub fn sign_out(&self) {
        *self.viewer.write().expect("The identity lock is never poisoned.") = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user_id(&self) -> Option<Id<UserMarker>> {
        self.viewer
            .read()
            .expect("The identity lock is never poisoned.")
            .as_ref()
            .map(|viewer| viewer.id.clone())
    }

    fn current_display_name(&self) -> Option<String> {
        self.viewer
            .read()
            .expect("The identity lock is never poisoned.")
            .as_ref()
            .and_then(|viewer| viewer.display_name.clone())
    }
}
