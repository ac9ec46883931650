//! Savage Aim client state engine.
//!
//! One [`Store`] per process holds everything a client shows: the session
//! user, the reference catalogs and the signed-in user's collections. Views
//! read it and subscribe to its paths; actions fetch from the backend and
//! replace state wholesale.
//!
//! # Session bootstrap
//!
//! [`Store::fetch_user`] resolves the requesting user. The first successful
//! resolution of a signed-in user loads their characters, notifications and
//! teams in the background, exactly once per session.
//!
//! # Navigation
//!
//! [`Store::before_each`] waits for the session and then allows or
//! redirects a navigation according to the static route table.
//!
//! ```ignore
//! let store = Store::from_config(&ClientConfig::load(&path)?, Arc::new(LogSink))?;
//! store.load_catalogs().await;
//! match store.before_each("/team/7f1c/").await {
//!     Navigation::Proceed(route) => render(route, &store),
//!     Navigation::Redirect(location) => go(location),
//! }
//! ```

#[path = "../dsl/model/mod.rs"]
pub mod model;

#[path = "../dsl/state/mod.rs"]
pub mod state;

mod actions;
pub mod config;
pub mod error;
pub mod guard;
pub mod permissions;
pub mod routes;
mod session;
mod store;
pub mod toast;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, ConfigError, Endpoints};
pub use error::{FieldErrors, WriteError};
pub use guard::{error_route, ErrorRoute, Location, Navigation};
pub use permissions::{Capability, TeamAccess};
pub use routes::{resolve, AccessPolicy, RouteMatch, RouteName};
pub use savageaim_client::ApiError;
pub use savageaim_flux::{PatternError, StateValue, SubscriptionId};
pub use state::SessionStatus;
pub use store::Store;
pub use toast::{ChannelSink, LogSink, Severity, Toast, ToastSink};
