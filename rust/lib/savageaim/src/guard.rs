//! Navigation guard and error-status routing.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::routes::{resolve, AccessPolicy, RouteMatch, RouteName};
use crate::store::Store;
use crate::toast::Toast;

/// A named route plus the params handed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub name: RouteName,
    pub params: BTreeMap<String, String>,
}

impl Location {
    pub fn new(name: RouteName) -> Self {
        Self {
            name,
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// The auth view, told to send the visitor back afterwards.
    pub fn auth_redirect() -> Self {
        Self::new(RouteName::Auth).param("redirect", "true")
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Navigation {
    Proceed(RouteMatch),
    Redirect(Location),
}

impl Store {
    /// Decide whether `path` may be opened.
    ///
    /// Waits for the session to resolve first if it has not yet. Resolution
    /// failures are not retried here; the visitor is treated as anonymous.
    pub async fn before_each(&self, path: &str) -> Navigation {
        if !self.user_loaded() {
            self.fetch_user().await;
        }
        let target = resolve(path);
        if target.policy() == AccessPolicy::RequiresSession && !self.user().is_authenticated() {
            debug!(route = %target.name, path = %target.path, "anonymous visitor sent to auth");
            return Navigation::Redirect(Location::auth_redirect().param("next", target.path));
        }
        Navigation::Proceed(target)
    }

    /// Where to go after a request made from `current_path` failed with
    /// `status`. `None` means stay put; unexpected codes are toasted.
    pub fn handle_error(&self, status: u16, current_path: &str) -> Option<Location> {
        match error_route(status, current_path) {
            ErrorRoute::Stay => None,
            ErrorRoute::Navigate(location) => Some(location),
            ErrorRoute::Notify(toast) => {
                self.inner.toasts.notify(toast);
                None
            }
        }
    }
}

/// What a failed response status means for the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorRoute {
    /// The form shows the field errors itself.
    Stay,
    Navigate(Location),
    Notify(Toast),
}

pub fn error_route(status: u16, current_path: &str) -> ErrorRoute {
    match status {
        400 => ErrorRoute::Stay,
        403 => ErrorRoute::Navigate(Location::auth_redirect()),
        404 => {
            let catch_all = resolve(current_path).path.trim_matches('/').to_string();
            ErrorRoute::Navigate(Location::new(RouteName::NotFound).param("catchAll", catch_all))
        }
        500 => ErrorRoute::Navigate(Location::new(RouteName::ServerError)),
        code => ErrorRoute::Notify(Toast::danger(format!("Unexpected HTTP Error Code; {}.", code))),
    }
}
