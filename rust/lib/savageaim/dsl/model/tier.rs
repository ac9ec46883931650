use serde::{Deserialize, Serialize};

/// A raid tier. The catalog is ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: u64,
    pub name: String,
    pub max_item_level: u32,
    #[serde(default)]
    pub raid_gear_name: String,
    #[serde(default)]
    pub tome_gear_name: String,
}
