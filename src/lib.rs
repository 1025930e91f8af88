//! eps_tracker library: EPS package tracking as JSON
//!
//! Logs in to the EPS portal once, scrapes the tracking page (cached for one
//! minute, or fresh on demand) and turns every package on it into a typed
//! record.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use eps_tracker::config::Credentials;
//! use eps_tracker::fetch::SystemClock;
//! use eps_tracker::initialization::init_session;
//! use eps_tracker::{Config, PackagePipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let credentials = Credentials {
//!     name: "me@example.com".to_string(),
//!     password: "secret".to_string(),
//! };
//!
//! let session = init_session(&config, &credentials).await?;
//! let pipeline = Arc::new(PackagePipeline::new(session, SystemClock));
//!
//! let result = pipeline.get_packages(true).await?;
//! println!("{} packages (logged in: {})", result.items.len(), result.logged_in);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod models;
mod parse;
mod pipeline;
pub mod server;
pub mod status;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ConfigError, FetchError, InitializationError, TransformError};
pub use models::{PackageEntry, PackageListResult, PackageRecord};
pub use parse::{extract_packages, transform_package};
pub use pipeline::PackagePipeline;
pub use status::TrackingStatus;
