//! `savageaim me`, `savageaim open <path>`.

use anyhow::Result;
use savageaim::{Navigation, Store};
use serde_json::json;

use super::print_json;

/// Resolve the session and print the user with their collections.
pub async fn me(store: &Store, output_json: bool) -> Result<()> {
    store.fetch_user().await;
    store.settle().await;

    let session = store.session();
    let characters = store.characters();
    let teams = store.teams();

    if output_json {
        return print_json(&json!({
            "user": session.user,
            "status": session.status,
            "characters": characters.0,
            "teams": teams.0.iter().map(|t| json!({"id": t.id, "name": t.name})).collect::<Vec<_>>(),
            "unreadNotifications": store.unread_notification_count(),
        }));
    }

    let Some(id) = session.user.id else {
        println!("Not signed in (status: {:?}).", session.status);
        return Ok(());
    };
    println!("User:     {} (id {})", session.user.username, id);
    println!("Theme:    {}", session.user.theme);
    println!("Unread:   {}", store.unread_notification_count());
    println!();
    println!("{:<10} {:<32} {:<10}", "ID", "CHARACTER", "VERIFIED");
    for c in &characters.0 {
        println!("{:<10} {:<32} {:<10}", c.id, c.display_name(), c.verified);
    }
    println!();
    println!("{} team(s).", teams.0.len());
    Ok(())
}

/// Run the navigation guard for `path`.
pub async fn open(store: &Store, path: &str, output_json: bool) -> Result<()> {
    let nav = store.before_each(path).await;
    if output_json {
        return print_json(&nav);
    }
    match nav {
        Navigation::Proceed(route) => {
            println!("open {} ({})", route.name, route.path);
            for (key, value) in &route.params {
                println!("  {} = {}", key, value);
            }
        }
        Navigation::Redirect(location) => {
            println!("redirect to {}", location.name);
            for (key, value) in &location.params {
                println!("  {} = {}", key, value);
            }
        }
    }
    Ok(())
}
