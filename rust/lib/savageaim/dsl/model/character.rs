use serde::{Deserialize, Serialize};

use super::bis_list::BisList;

/// A game character claimed by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub lodestone_id: String,
    pub name: String,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub verified: bool,
    pub world: String,
    /// Only present on detail payloads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bis_lists: Vec<BisList>,
}

impl Character {
    /// Unverified characters cannot join or lead teams.
    pub fn can_join_teams(&self) -> bool {
        self.verified
    }

    /// `Name @ World`, or the alias when one is set.
    pub fn display_name(&self) -> String {
        if self.alias.is_empty() {
            format!("{} @ {}", self.name, self.world)
        } else {
            self.alias.clone()
        }
    }
}
