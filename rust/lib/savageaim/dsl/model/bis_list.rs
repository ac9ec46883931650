//! Best-in-slot lists and their write payload.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::gear::Gear;
use super::job::Job;
use crate::error::FieldErrors;

/// Job whose offhand is a separate item from its mainhand.
const SHIELD_JOB: &str = "PLD";

const NAME_MAX_CHARS: usize = 64;

/// Category of item an equipment slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearKind {
    Weapon,
    Armour,
    Accessory,
}

/// Equipment slot, in the order the backend lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Body,
    Bracelet,
    Earrings,
    Feet,
    Hands,
    Head,
    LeftRing,
    Legs,
    Mainhand,
    Necklace,
    Offhand,
    RightRing,
}

impl Slot {
    pub const ALL: [Slot; 12] = [
        Slot::Body,
        Slot::Bracelet,
        Slot::Earrings,
        Slot::Feet,
        Slot::Hands,
        Slot::Head,
        Slot::LeftRing,
        Slot::Legs,
        Slot::Mainhand,
        Slot::Necklace,
        Slot::Offhand,
        Slot::RightRing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Body => "body",
            Slot::Bracelet => "bracelet",
            Slot::Earrings => "earrings",
            Slot::Feet => "feet",
            Slot::Hands => "hands",
            Slot::Head => "head",
            Slot::LeftRing => "left_ring",
            Slot::Legs => "legs",
            Slot::Mainhand => "mainhand",
            Slot::Necklace => "necklace",
            Slot::Offhand => "offhand",
            Slot::RightRing => "right_ring",
        }
    }

    pub fn kind(self) -> GearKind {
        match self {
            Slot::Mainhand | Slot::Offhand => GearKind::Weapon,
            Slot::Head | Slot::Body | Slot::Hands | Slot::Legs | Slot::Feet => GearKind::Armour,
            Slot::Earrings | Slot::Necklace | Slot::Bracelet | Slot::LeftRing | Slot::RightRing => {
                GearKind::Accessory
            }
        }
    }
}

/// A character's gearing plan for one job: target and currently equipped
/// gear for every slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BisList {
    pub id: u64,
    pub job: Job,
    #[serde(default)]
    pub item_level: u32,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,

    pub bis_body: Gear,
    pub bis_bracelet: Gear,
    pub bis_earrings: Gear,
    pub bis_feet: Gear,
    pub bis_hands: Gear,
    pub bis_head: Gear,
    pub bis_left_ring: Gear,
    pub bis_legs: Gear,
    pub bis_mainhand: Gear,
    pub bis_necklace: Gear,
    pub bis_offhand: Gear,
    pub bis_right_ring: Gear,

    pub current_body: Gear,
    pub current_bracelet: Gear,
    pub current_earrings: Gear,
    pub current_feet: Gear,
    pub current_hands: Gear,
    pub current_head: Gear,
    pub current_left_ring: Gear,
    pub current_legs: Gear,
    pub current_mainhand: Gear,
    pub current_necklace: Gear,
    pub current_offhand: Gear,
    pub current_right_ring: Gear,
}

impl BisList {
    pub fn bis(&self, slot: Slot) -> &Gear {
        match slot {
            Slot::Body => &self.bis_body,
            Slot::Bracelet => &self.bis_bracelet,
            Slot::Earrings => &self.bis_earrings,
            Slot::Feet => &self.bis_feet,
            Slot::Hands => &self.bis_hands,
            Slot::Head => &self.bis_head,
            Slot::LeftRing => &self.bis_left_ring,
            Slot::Legs => &self.bis_legs,
            Slot::Mainhand => &self.bis_mainhand,
            Slot::Necklace => &self.bis_necklace,
            Slot::Offhand => &self.bis_offhand,
            Slot::RightRing => &self.bis_right_ring,
        }
    }

    pub fn current(&self, slot: Slot) -> &Gear {
        match slot {
            Slot::Body => &self.current_body,
            Slot::Bracelet => &self.current_bracelet,
            Slot::Earrings => &self.current_earrings,
            Slot::Feet => &self.current_feet,
            Slot::Hands => &self.current_hands,
            Slot::Head => &self.current_head,
            Slot::LeftRing => &self.current_left_ring,
            Slot::Legs => &self.current_legs,
            Slot::Mainhand => &self.current_mainhand,
            Slot::Necklace => &self.current_necklace,
            Slot::Offhand => &self.current_offhand,
            Slot::RightRing => &self.current_right_ring,
        }
    }

    /// Slots where the equipped item differs from the target.
    pub fn unfinished_slots(&self) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| self.bis(slot).id != self.current(slot).id)
            .collect()
    }
}

/// Create/update payload for a BIS list. Gear is referenced by id.
///
/// Serializes to the flat `bis_<slot>_id` / `current_<slot>_id` shape the
/// backend expects; unset slots are sent as `-1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BisListModify {
    /// `None` for a list that has not been created yet.
    pub id: Option<u64>,
    pub job_id: String,
    pub bis: BTreeMap<Slot, u64>,
    pub current: BTreeMap<Slot, u64>,
    pub external_link: Option<String>,
    pub name: String,
}

impl BisListModify {
    /// Edit payload for an existing list.
    pub fn from_list(list: &BisList) -> Self {
        Self {
            id: Some(list.id),
            job_id: list.job.id.clone(),
            bis: Slot::ALL.into_iter().map(|s| (s, list.bis(s).id)).collect(),
            current: Slot::ALL.into_iter().map(|s| (s, list.current(s).id)).collect(),
            external_link: list.external_link.clone(),
            name: list.name.clone(),
        }
    }

    /// Check the payload against the catalogs and return the normalised
    /// form that will be sent.
    ///
    /// Only the shield job keeps a separate offhand; every other job sends
    /// its mainhand in the offhand slot. A blank link becomes `None`.
    pub fn validate(&self, gear: &[Gear], jobs: &[Job]) -> Result<Self, FieldErrors> {
        let mut out = self.clone();
        let mut errors = FieldErrors::default();

        if !jobs.iter().any(|j| j.id == self.job_id) {
            errors.push("job_id", "Please select a valid Job.");
        }
        if self.job_id != SHIELD_JOB {
            if let Some(&id) = self.bis.get(&Slot::Mainhand) {
                out.bis.insert(Slot::Offhand, id);
            }
            if let Some(&id) = self.current.get(&Slot::Mainhand) {
                out.current.insert(Slot::Offhand, id);
            }
        }

        for slot in Slot::ALL {
            for (prefix, chosen) in [("bis", &out.bis), ("current", &out.current)] {
                let field = format!("{}_{}_id", prefix, slot.as_str());
                match chosen.get(&slot).and_then(|id| gear.iter().find(|g| g.id == *id)) {
                    None => errors.push(&field, "Please select a valid type of Gear."),
                    Some(g) if !g.provides(slot.kind()) => errors.push(
                        &field,
                        "The chosen type of Gear is invalid for this equipment slot.",
                    ),
                    Some(_) => {}
                }
            }
        }

        if self.name.chars().count() > NAME_MAX_CHARS {
            errors.push("name", "Ensure this field has no more than 64 characters.");
        }
        out.external_link = self
            .external_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(str::to_string);

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }
}

impl Serialize for BisListModify {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = self.id {
            map.serialize_entry("id", &id)?;
        }
        map.serialize_entry("job_id", &self.job_id)?;
        for slot in Slot::ALL {
            let bis = self.bis.get(&slot).map_or(-1, |&id| id as i64);
            map.serialize_entry(&format!("bis_{}_id", slot.as_str()), &bis)?;
        }
        for slot in Slot::ALL {
            let current = self.current.get(&slot).map_or(-1, |&id| id as i64);
            map.serialize_entry(&format!("current_{}_id", slot.as_str()), &current)?;
        }
        map.serialize_entry("external_link", &self.external_link)?;
        map.serialize_entry("name", &self.name)?;
        map.end()
    }
}
