//! `savageaim catalogs`.

use anyhow::Result;
use savageaim::Store;
use serde_json::json;

use super::print_json;

pub async fn show(store: &Store, output_json: bool) -> Result<()> {
    store.load_catalogs().await;

    let gear = store.gear();
    let jobs = store.jobs();
    let tiers = store.tiers();
    let levels = store.item_levels();

    if output_json {
        return print_json(&json!({
            "gear": gear.0,
            "jobs": jobs.0,
            "tiers": tiers.0,
            "itemLevels": levels,
        }));
    }

    println!("Item levels {} - {}", levels.min, levels.max);
    if let Some(tier) = tiers.current() {
        println!("Current tier: {} (max item level {})", tier.name, tier.max_item_level);
    }
    println!();
    println!("{:<6} {:<32} {:<6}", "ID", "GEAR", "ILVL");
    for g in &gear.0 {
        println!("{:<6} {:<32} {:<6}", g.id, g.name, g.item_level);
    }
    println!();
    println!("{:<6} {:<24} {:<6}", "JOB", "NAME", "ROLE");
    for j in &jobs.0 {
        println!("{:<6} {:<24} {:?}", j.id, j.display_name, j.role);
    }
    Ok(())
}
