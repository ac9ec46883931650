//! What the session user may do within a team.
//!
//! Everything here is derived from the team as currently held; nothing is
//! cached. A user holds a grant when any member whose character they own
//! holds it. An anonymous user holds nothing.

use serde::Serialize;

use crate::model::{MemberPermissions, Team, TeamMember};

/// A grant a team lead can hand to members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    LootManager,
    ProxyManager,
}

impl MemberPermissions {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::LootManager => self.loot_manager,
            Capability::ProxyManager => self.proxy_manager,
        }
    }
}

fn owns(user_id: Option<u64>, member: &TeamMember) -> bool {
    user_id.is_some_and(|id| member.character.user_id == id)
}

pub fn has_capability(team: &Team, user_id: Option<u64>, capability: Capability) -> bool {
    team.members
        .iter()
        .filter(|m| m.permissions.allows(capability))
        .any(|m| owns(user_id, m))
}

pub fn has_loot_manager_permission(team: &Team, user_id: Option<u64>) -> bool {
    has_capability(team, user_id, Capability::LootManager)
}

pub fn has_proxy_manager_permission(team: &Team, user_id: Option<u64>) -> bool {
    has_capability(team, user_id, Capability::ProxyManager)
}

pub fn is_team_lead(team: &Team, user_id: Option<u64>) -> bool {
    team.members.iter().filter(|m| m.lead).any(|m| owns(user_id, m))
}

/// All of the session user's grants in one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamAccess {
    pub lead: bool,
    pub loot_manager: bool,
    pub proxy_manager: bool,
}

impl TeamAccess {
    pub fn derive(team: &Team, user_id: Option<u64>) -> Self {
        Self {
            lead: is_team_lead(team, user_id),
            loot_manager: has_loot_manager_permission(team, user_id),
            proxy_manager: has_proxy_manager_permission(team, user_id),
        }
    }
}
