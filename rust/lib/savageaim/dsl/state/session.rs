//! Session state, stored at `session/state`.

use savageaim_flux::State;
use serde::Serialize;

use crate::model::User;

/// Where the session bootstrap stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// No resolution has succeeded yet.
    #[default]
    Unresolved,
    /// First resolution is in flight.
    Resolving,
    /// A user (possibly anonymous) has been committed.
    Resolved,
}

/// The current user plus the `userLoaded` latch.
///
/// Both live in one value so they always change together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub user: User,
    pub status: SessionStatus,
}

impl SessionState {
    /// Whether any `me/` response has been committed since the last reset.
    pub fn user_loaded(&self) -> bool {
        self.status == SessionStatus::Resolved
    }
}

impl State for SessionState {
    const PATH: &'static str = "session/state";
}
