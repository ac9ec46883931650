use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bis_list::BisList;
use super::character::Character;
use super::tier::Tier;

/// Grants a member holds within one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPermissions {
    #[serde(default)]
    pub loot_manager: bool,
    /// Sent by the backend as `team_characters`.
    #[serde(default, alias = "team_characters")]
    pub proxy_manager: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub character: Character,
    pub bis_list: BisList,
    #[serde(default)]
    pub lead: bool,
    #[serde(default)]
    pub permissions: MemberPermissions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub invite_code: String,
    pub members: Vec<TeamMember>,
    pub tier: Tier,
    #[serde(default)]
    pub solver_sort_overrides: BTreeMap<String, i32>,
}

impl Team {
    pub fn lead(&self) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.lead)
    }

    pub fn member(&self, id: u64) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }
}
