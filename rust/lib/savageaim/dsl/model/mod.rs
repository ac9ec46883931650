//! Entity contracts shared with the backend.
//!
//! Field names follow the backend's JSON. Missing optional fields fall back
//! to their defaults so older payloads still decode.

pub mod bis_list;
pub mod character;
pub mod gear;
pub mod job;
pub mod notification;
pub mod team;
pub mod tier;
pub mod user;

pub use bis_list::{BisList, BisListModify, GearKind, Slot};
pub use character::Character;
pub use gear::{Gear, ItemLevels};
pub use job::{Job, JobRole};
pub use notification::Notification;
pub use team::{MemberPermissions, Team, TeamMember};
pub use tier::Tier;
pub use user::{NotificationSettings, SettingsUpdate, User};
