//! `savageaim teams`.

use anyhow::Result;
use savageaim::Store;
use serde_json::json;

use super::print_json;

pub async fn list(store: &Store, output_json: bool) -> Result<()> {
    store.fetch_user().await;
    store.settle().await;
    if !store.user().is_authenticated() {
        anyhow::bail!("Not signed in. Set session_cookie or api_token in the config file.");
    }

    let teams = store.teams();
    let rows: Vec<_> = teams
        .0
        .iter()
        .map(|team| (team, store.team_access(&team.id).unwrap_or_default()))
        .collect();

    if output_json {
        let out: Vec<_> = rows
            .iter()
            .map(|(team, access)| {
                json!({
                    "id": team.id,
                    "name": team.name,
                    "tier": team.tier.name,
                    "members": team.members.len(),
                    "access": access,
                })
            })
            .collect();
        return print_json(&out);
    }

    println!(
        "{:<38} {:<24} {:<16} {:<5} {:<5} {:<5}",
        "ID", "NAME", "TIER", "LEAD", "LOOT", "PROXY"
    );
    for (team, access) in rows {
        println!(
            "{:<38} {:<24} {:<16} {:<5} {:<5} {:<5}",
            team.id, team.name, team.tier.name, access.lead, access.loot_manager, access.proxy_manager
        );
    }
    Ok(())
}
