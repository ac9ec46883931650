//! Reference catalogs shared by every visitor, under `catalog/`.

use savageaim_flux::State;
use serde::Serialize;

use crate::model::{Gear, Job, Tier};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GearCatalog(pub Vec<Gear>);

impl State for GearCatalog {
    const PATH: &'static str = "catalog/gear";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobCatalog(pub Vec<Job>);

impl State for JobCatalog {
    const PATH: &'static str = "catalog/jobs";
}

/// Tiers, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierCatalog(pub Vec<Tier>);

impl TierCatalog {
    pub fn current(&self) -> Option<&Tier> {
        self.0.first()
    }
}

impl State for TierCatalog {
    const PATH: &'static str = "catalog/tiers";
}

/// Item level range of the gear catalog. Zero until fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ItemLevelBounds {
    pub min: u32,
    pub max: u32,
}

impl State for ItemLevelBounds {
    const PATH: &'static str = "catalog/item_levels";
}
