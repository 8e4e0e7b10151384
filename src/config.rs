//! This module holds the configuration for the server

use std::net::IpAddr;

use actix_toolbox::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Configuration regarding the server
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct ServerConfig {
    /// The address the server should bind to
    pub listen_address: IpAddr,
    /// The port the server should bind to
    pub listen_port: u16,
    /// Base64 encoded key to sign and encrypt the session cookies.
    ///
    /// Must decode to at least 64 bytes.
    pub secret_key: String,
    /// Only send the session cookie over https
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

/// Configuration regarding the stores
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StoreConfig {
    /// Artificial delay of every account operation in milliseconds
    #[serde(default)]
    pub simulated_latency_ms: u64,
    /// Load the demo accounts and events on start
    #[serde(default)]
    pub seed: bool,
}

/// Configuration regarding the external game catalog
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct GameLookupConfig {
    /// Base url of the BoardGameGeek XML API 2
    #[serde(default = "default_lookup_url")]
    pub base_url: String,
    /// Timeout of a single request in seconds
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
    /// Quiet period after the last search of a client in milliseconds
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

impl Default for GameLookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_lookup_url(),
            timeout_secs: default_lookup_timeout(),
            debounce_ms: default_debounce(),
        }
    }
}

fn default_lookup_url() -> String {
    String::from("https://boardgamegeek.com/xmlapi2")
}

fn default_lookup_timeout() -> u64 {
    10
}

fn default_debounce() -> u64 {
    500
}

/// This struct can be parsed from the configuration file
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    /// Configuration regarding the server
    pub server: ServerConfig,
    /// The logging configuration
    pub logging: LoggingConfig,
    /// Configuration regarding the stores
    pub store: StoreConfig,
    /// Configuration regarding the game catalog
    #[serde(default)]
    pub game_lookup: GameLookupConfig,
}

fn default_secure_cookies() -> bool {
    true
}
