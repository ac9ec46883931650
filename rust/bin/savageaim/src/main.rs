//! `savageaim`: the Savage Aim command line client.
//!
//! Resolves a session against a Savage Aim backend and prints what a
//! browser client would show.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use savageaim::{ClientConfig, LogSink, Store};
use tracing::debug;

/// Savage Aim CLI tool.
#[derive(Parser, Debug)]
#[command(name = "savageaim", about = "Savage Aim CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.savageaim/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Backend origin, overriding the config file.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the session user and their collections.
    Me,

    /// Check whether a view path may be opened.
    Open {
        /// View path (e.g. /team/7f1c/loot/).
        path: String,
    },

    /// List the session user's teams and their grants in each.
    Teams,

    /// Show the reference catalogs.
    Catalogs,

    /// Show version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load(&config_path)?;
    if let Some(server) = cli.server {
        config.server = server;
    }
    debug!(config = %config_path.display(), server = %config.server, "config loaded");

    let json_output = cli.output == "json";
    let store = Store::from_config(&config, Arc::new(LogSink))?;

    match cli.command {
        Commands::Me => commands::session::me(&store, json_output).await?,
        Commands::Open { path } => commands::session::open(&store, &path, json_output).await?,
        Commands::Teams => commands::teams::list(&store, json_output).await?,
        Commands::Catalogs => commands::catalogs::show(&store, json_output).await?,
        Commands::Version => println!("savageaim cli v{}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
