//! State definitions.
//!
//! Each file defines the state types stored at well-known paths. Views read
//! them through the store and subscribe to their paths.

pub mod catalog;
pub mod collections;
pub mod session;

pub use catalog::{GearCatalog, ItemLevelBounds, JobCatalog, TierCatalog};
pub use collections::{Characters, Notifications, Teams};
pub use session::{SessionState, SessionStatus};
