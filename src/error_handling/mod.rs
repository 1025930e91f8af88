//! Error handling.
//!
//! Errors are categorized by how far they travel:
//! - **Initialization / config errors**: abort startup
//! - **Fetch errors**: escape the pipeline and fail the request
//! - **Transform errors**: absorbed per fragment (the fragment becomes an empty record)

mod types;

// Re-export public API
pub use types::{ConfigError, FetchError, InitializationError, TransformError};
