use serde::{Deserialize, Serialize};

use super::bis_list::GearKind;

/// A piece of gear from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub id: u64,
    pub name: String,
    pub item_level: u32,
    #[serde(default)]
    pub has_accessories: bool,
    #[serde(default)]
    pub has_armour: bool,
    #[serde(default)]
    pub has_weapon: bool,
}

impl Gear {
    /// Whether this gear set provides items of the given kind.
    pub fn provides(&self, kind: GearKind) -> bool {
        match kind {
            GearKind::Weapon => self.has_weapon,
            GearKind::Armour => self.has_armour,
            GearKind::Accessory => self.has_accessories,
        }
    }
}

/// Item level range covered by the gear catalog (`gear/item_levels/`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLevels {
    pub min: u32,
    pub max: u32,
}
