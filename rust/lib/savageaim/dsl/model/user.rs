//! Session user, as returned by `GET me/`.

use serde::{Deserialize, Serialize};

/// The requesting user. `id == None` is an anonymous visitor, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub avatar_url: String,
    pub id: Option<u64>,
    #[serde(default)]
    pub loot_manager_version: String,
    #[serde(default)]
    pub loot_solver_greed: bool,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub username: String,
}

fn default_theme() -> String {
    "beta".to_string()
}

impl User {
    /// Placeholder user held before a session resolves and after logout.
    pub fn anonymous() -> Self {
        Self {
            avatar_url: String::new(),
            id: None,
            loot_manager_version: String::new(),
            loot_solver_greed: false,
            notifications: NotificationSettings::default(),
            token: None,
            theme: default_theme(),
            username: String::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }
}

impl Default for User {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Per-event opt-in flags. Every event is on unless the user turned it off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub loot_tracker_update: bool,
    pub team_disband: bool,
    pub team_join: bool,
    pub team_kick: bool,
    pub team_lead: bool,
    pub team_leave: bool,
    pub team_proxy_claim: bool,
    pub team_rename: bool,
    pub verify_fail: bool,
    pub verify_success: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            loot_tracker_update: true,
            team_disband: true,
            team_join: true,
            team_kick: true,
            team_lead: true,
            team_leave: true,
            team_proxy_claim: true,
            team_rename: true,
            verify_fail: true,
            verify_success: true,
        }
    }
}

/// Body of `PUT me/`. Unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loot_solver_greed: Option<bool>,
}
