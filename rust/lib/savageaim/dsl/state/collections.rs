//! Per-user collections, under `user/`. Empty until the session resolves.

use savageaim_flux::State;
use serde::Serialize;

use crate::model::{Character, Notification, Team};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Characters(pub Vec<Character>);

impl State for Characters {
    const PATH: &'static str = "user/characters";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Teams(pub Vec<Team>);

impl Teams {
    pub fn find(&self, id: &str) -> Option<&Team> {
        self.0.iter().find(|t| t.id == id)
    }
}

impl State for Teams {
    const PATH: &'static str = "user/teams";
}

/// The most recent notifications, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Notifications(pub Vec<Notification>);

impl Notifications {
    pub fn unread(&self) -> usize {
        self.0.iter().filter(|n| !n.read).count()
    }
}

impl State for Notifications {
    const PATH: &'static str = "user/notifications";
}
