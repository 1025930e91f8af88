//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (portal paths, cache window, limits)
//! - CLI option types and parsing
//! - Credentials file loading

mod constants;
mod credentials;
mod types;

// Re-export all constants
pub use constants::*;
pub use credentials::{load_credentials, Credentials};
pub use types::{Config, LogFormat, LogLevel, Opt};
