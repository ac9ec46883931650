//! Static route table.
//!
//! Paths are matched segment by segment in table order; the first match
//! wins and anything unmatched lands on the not-found view. A trailing
//! slash is optional.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteName {
    Home,
    Auth,
    NewChar,
    ViewChar,
    NewBis,
    EditBis,
    UserNotifs,
    UserSettings,
    AddTeam,
    NewTeam,
    TeamOverview,
    TeamLoot,
    TeamManagement,
    TeamMemberManage,
    TeamSettings,
    TeamJoin,
    TeamNewProxy,
    TeamEditProxy,
    ServerError,
    NotFound,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessPolicy {
    /// Reachable by anonymous visitors.
    Public,
    /// Anonymous visitors are sent to the auth view.
    RequiresSession,
}

struct RouteDef {
    name: RouteName,
    pattern: &'static str,
    policy: AccessPolicy,
}

const fn route(name: RouteName, pattern: &'static str, policy: AccessPolicy) -> RouteDef {
    RouteDef { name, pattern, policy }
}

use AccessPolicy::{Public, RequiresSession};

static ROUTES: &[RouteDef] = &[
    route(RouteName::Home, "/", Public),
    route(RouteName::Auth, "/auth/", Public),
    route(RouteName::NewChar, "/characters/new/", RequiresSession),
    route(RouteName::ViewChar, "/characters/:characterId/", RequiresSession),
    route(RouteName::NewBis, "/characters/:characterId/bis_list/", RequiresSession),
    route(RouteName::EditBis, "/characters/:characterId/bis_list/:bisId/", RequiresSession),
    route(RouteName::UserNotifs, "/notifications/", RequiresSession),
    route(RouteName::UserSettings, "/settings/", RequiresSession),
    route(RouteName::AddTeam, "/team/", RequiresSession),
    route(RouteName::NewTeam, "/team/new/", RequiresSession),
    route(RouteName::TeamOverview, "/team/:teamId/", RequiresSession),
    route(RouteName::TeamLoot, "/team/:teamId/loot/", RequiresSession),
    route(RouteName::TeamManagement, "/team/:teamId/management/", RequiresSession),
    route(RouteName::TeamMemberManage, "/team/:teamId/member/:memberId/", RequiresSession),
    route(RouteName::TeamSettings, "/team/:teamId/settings/", RequiresSession),
    route(RouteName::TeamJoin, "/team/join/:teamId/", RequiresSession),
    route(RouteName::TeamNewProxy, "/team/:teamId/proxies/", RequiresSession),
    route(RouteName::TeamEditProxy, "/team/:teamId/proxies/:charId/", RequiresSession),
    route(RouteName::ServerError, "/errors/500/", RequiresSession),
];

impl RouteName {
    fn def(self) -> Option<&'static RouteDef> {
        ROUTES.iter().find(|r| r.name == self)
    }

    /// Name used in links and redirects (`teamOverview`, `errors/404`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Auth => "auth",
            RouteName::NewChar => "newChar",
            RouteName::ViewChar => "viewChar",
            RouteName::NewBis => "newBIS",
            RouteName::EditBis => "editBIS",
            RouteName::UserNotifs => "userNotifs",
            RouteName::UserSettings => "userSettings",
            RouteName::AddTeam => "addTeam",
            RouteName::NewTeam => "newTeam",
            RouteName::TeamOverview => "teamOverview",
            RouteName::TeamLoot => "teamLoot",
            RouteName::TeamManagement => "teamManagement",
            RouteName::TeamMemberManage => "teamMemberManage",
            RouteName::TeamSettings => "teamSettings",
            RouteName::TeamJoin => "teamJoin",
            RouteName::TeamNewProxy => "teamNewProxy",
            RouteName::TeamEditProxy => "teamEditProxy",
            RouteName::ServerError => "errors/500",
            RouteName::NotFound => "errors/404",
        }
    }

    pub fn policy(self) -> AccessPolicy {
        self.def().map_or(RequiresSession, |r| r.policy)
    }

    /// Path pattern, `None` for the catch-all.
    pub fn pattern(self) -> Option<&'static str> {
        self.def().map(|r| r.pattern)
    }

    /// Build a concrete path. Missing params leave the placeholder empty.
    pub fn path(self, params: &BTreeMap<String, String>) -> Option<String> {
        let pattern = self.pattern()?;
        let mut out = String::from("/");
        for seg in segments(pattern) {
            match seg.strip_prefix(':') {
                Some(key) => out.push_str(params.get(key).map_or("", String::as_str)),
                None => out.push_str(seg),
            }
            out.push('/');
        }
        Some(out)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub name: RouteName,
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn policy(&self) -> AccessPolicy {
        self.name.policy()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    let mut want = segments(pattern);
    let mut have = segments(path);
    loop {
        match (want.next(), have.next()) {
            (None, None) => return Some(params),
            (Some(w), Some(h)) => match w.strip_prefix(':') {
                Some(key) => {
                    params.insert(key.to_string(), h.to_string());
                }
                None if w == h => {}
                None => return None,
            },
            _ => return None,
        }
    }
}

/// Resolve a path (query and fragment ignored) against the route table.
pub fn resolve(path: &str) -> RouteMatch {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    for def in ROUTES {
        if let Some(params) = match_pattern(def.pattern, path) {
            return RouteMatch {
                name: def.name,
                path: path.to_string(),
                params,
            };
        }
    }
    let mut params = BTreeMap::new();
    params.insert("catchAll".to_string(), segments(path).collect::<Vec<_>>().join("/"));
    RouteMatch {
        name: RouteName::NotFound,
        path: path.to_string(),
        params,
    }
}
