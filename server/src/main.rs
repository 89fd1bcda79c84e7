//! jsonstore server
//!
//! Serves a single JSON document of collections over HTTP.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jsonstore_core::core::{create_app_state, Config};
use jsonstore_core::{log_info, Error, Result, VERSION};
use jsonstore_server::api::start_api_server;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let matches = Command::new("jsonstore-server")
        .version(VERSION)
        .about("File-backed JSON document store over HTTP")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address"),
        )
        .arg(
            Arg::new("store-path")
                .long("store-path")
                .value_name("FILE")
                .help("Backing JSON file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("storage-type")
                .long("storage-type")
                .value_name("TYPE")
                .help("Storage backend type (file, memory)"),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let mut config = Config::load(config_path)?;
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    log_info!("Starting jsonstore v{}", VERSION);

    // Create AppState using factory pattern
    let configured_app_state = create_app_state(config)?;
    log_info!("AppState created successfully");

    start_api_server(configured_app_state).await?;

    log_info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches) -> Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
    }

    if let Some(path) = matches.get_one::<String>("store-path") {
        config.storage.path = PathBuf::from(path);
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    if let Some(storage_type) = matches.get_one::<String>("storage-type") {
        config.storage.storage_type = storage_type.parse()?;
    }

    Ok(())
}
