//! The meeplemeet daemon

use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_toolbox::logging::setup_logging;
use clap::{Parser, Subcommand};
use log::{error, info};
use meeplemeet::chan::start_ws_manager;
use meeplemeet::config::Config;
use meeplemeet::lookup::{BggClient, Debouncer, GameCatalog};
use meeplemeet::server::start_server;
use meeplemeet::store::{seed, EventRoster, IdentityService, MemoryRepository};

/// The possible commands for meeplemeet
#[derive(Subcommand)]
pub enum Command {
    /// Start the server
    Start,
}

/// The cli parser for meeplemeet
#[derive(Parser)]
#[clap(version, about = "A board game meetup server")]
pub struct Cli {
    #[clap(long = "config-path")]
    #[clap(help = "Specify an alternative path to the config file")]
    #[clap(default_value_t = String::from("/etc/meeplemeet/config.toml"))]
    config_path: String,

    #[clap(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Start => {
            let conf = get_conf(&cli.config_path)?;

            setup_logging(&conf.logging)?;

            let identity = Arc::new(IdentityService::new(
                MemoryRepository::shared(),
                MemoryRepository::shared(),
                Duration::from_millis(conf.store.simulated_latency_ms),
            ));
            let roster = Arc::new(EventRoster::new(MemoryRepository::shared()));

            if conf.store.seed {
                seed::seed(&identity, &roster)
                    .await
                    .map_err(|err| format!("Could not seed demo data: {err}"))?;
            }

            let lookup = BggClient::new(
                &conf.game_lookup.base_url,
                Duration::from_secs(conf.game_lookup.timeout_secs),
            )
            .map_err(|err| format!("Could not create game lookup client: {err}"))?;
            let catalog = Arc::new(GameCatalog::new(
                Arc::new(lookup),
                Debouncer::new(Duration::from_millis(conf.game_lookup.debounce_ms)),
            ));
            info!("Initialized stores");

            let ws_manager_chan = start_ws_manager().await?;

            if let Err(err) = start_server(&conf, identity, roster, catalog, ws_manager_chan).await
            {
                error!("Error while starting server: {err}");
                return Err(err.to_string());
            }
        }
    }

    Ok(())
}

/// Retrieve a [Config] by Path
///
/// **Parameter**:
/// - `config_path`: [&str]
fn get_conf(config_path: &str) -> Result<Config, String> {
    let path = Path::new(config_path);

    if !path.exists() {
        return Err(format!("File {config_path} does not exist"));
    }

    if !path.is_file() {
        return Err(format!("{config_path} is a directory"));
    }

    let config_str =
        read_to_string(path).map_err(|err| format!("Could not read config file: {err}"))?;

    let config: Config =
        toml::from_str(&config_str).map_err(|err| format!("Could not parse config file: {err}"))?;

    Ok(config)
}
