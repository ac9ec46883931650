//! Flux: reactive state container primitives.
//!
//! Rust owns all client state; views only render it and subscribe to
//! changes. The container is path-addressed:
//!
//! - `set(value)`: replace the value at its type's path, notify subscribers
//! - `get::<T>()`: read the value at `T::PATH`, Arc zero-copy
//! - `subscribe(pattern)`: observe changes, MQTT-style pattern matched
//!
//! # Path Addressing
//!
//! Every state type declares one path with `/` as separator:
//! - Session: `session/state`
//! - Catalogs: `catalog/gear`, `catalog/jobs`
//! - Per-user collections: `user/characters`, `user/teams`
//!
//! # Patterns
//!
//! - Exact: `session/state`
//! - Single-level: `user/+` matches `user/teams`, `user/characters`
//! - Multi-level: `catalog/#` matches everything under `catalog/`
//! - All: `#`
//!
//! # Background Work
//!
//! [`TaskSet`] owns fire-and-forget tasks spawned by the container so they
//! are never tied to the frame that triggered them.

pub mod pattern;
pub mod store;
pub mod tasks;
pub mod value;

pub use pattern::{PatternError, TopicPattern};
pub use store::{ChangeHandler, StateStore};
pub use tasks::TaskSet;
pub use value::{State, StateValue, SubscriptionId};
