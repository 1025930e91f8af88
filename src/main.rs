//! Main application entry point (server binary).
//!
//! This is a thin wrapper around the `eps_tracker` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Login and server startup
//!
//! All core functionality is implemented in the library crate.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use eps_tracker::config::{load_credentials, Opt};
use eps_tracker::fetch::SystemClock;
use eps_tracker::initialization::{init_logger_with, init_session};
use eps_tracker::server::start_server;
use eps_tracker::{Config, PackagePipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting EPS_USER_NAME / EPS_USER_PASSWORD without exporting them
    let _ = dotenvy::dotenv();

    let config = Config::from(Opt::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let credentials =
        load_credentials(&config.config_path).context("Failed to load credentials")?;

    let session = init_session(&config, &credentials)
        .await
        .context("Failed to start portal session")?;

    let pipeline = Arc::new(PackagePipeline::new(session, SystemClock));

    start_server(&config.bind, config.port, pipeline).await
}
