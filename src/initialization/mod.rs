//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger
//! - HTTP client (cookie store, manual redirects, timeout)
//! - The logged-in portal session
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use crate::config::{Config, Credentials};
use crate::error_handling::InitializationError;
use crate::fetch::PortalSession;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Builds the portal client and logs in once.
///
/// The returned session is meant to be created at startup and shared for the
/// lifetime of the process.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the base URL is invalid, or
/// the login request fails at the transport level. A rejected login is not an
/// error.
pub async fn init_session(
    config: &Config,
    credentials: &Credentials,
) -> Result<PortalSession, InitializationError> {
    let client = init_client(config)?;
    let session = PortalSession::new(client, &config.base_url)?;
    session.login(credentials).await?;
    Ok(session)
}
