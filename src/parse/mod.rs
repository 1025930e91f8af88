//! HTML parsing and data extraction.
//!
//! This module turns the portal's tracking page into package entries.
//! All parsing is done using CSS selectors via the `scraper` crate.

mod package;

// Re-export public API
pub use package::{extract_packages, transform_package};
