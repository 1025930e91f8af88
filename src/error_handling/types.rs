//! Error type definitions.
//!
//! This module defines all error types used throughout the service.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured portal base URL is not a valid URL.
    #[error("Invalid portal URL '{url}': {source}")]
    InvalidUrlError {
        /// The offending URL
        url: String,
        /// Underlying parse error
        source: url::ParseError,
    },

    /// The login POST (or a redirect after it) failed at the transport level.
    #[error("Login request failed: {0}")]
    LoginError(#[source] FetchError),
}

/// Error types for reading the credentials file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        /// Path of the credentials file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML.
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        /// Path of the credentials file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}

/// Upstream fetch failures.
///
/// These are the only failures that escape the package pipeline; the route
/// layer turns them into a 500. There is no retry.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("Upstream request failed: {0}")]
    Transport(#[from] ReqwestError),

    /// A redirect carried a `Location` that could not be resolved to a URL.
    #[error("Invalid redirect location '{location}' from {from}")]
    InvalidRedirect {
        /// URL that answered with the redirect
        from: String,
        /// Raw `Location` header value
        location: String,
    },

    /// The redirect chain exceeded the hop limit.
    #[error("Too many redirects ({hops}) fetching {url}")]
    TooManyRedirects {
        /// URL originally requested
        url: String,
        /// Hops followed before giving up
        hops: usize,
    },
}

/// Reasons a scraped fragment could not be turned into a package record.
///
/// Never surfaced past the transformer: every variant downgrades the fragment
/// to an empty record. Kept distinct only for debug logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The fragment has no `data-groups` attribute.
    #[error("fragment has no data-groups attribute")]
    MissingGroups,

    /// `data-groups` did not split into exactly three tokens.
    #[error("data-groups has {0} tokens, expected 3")]
    MalformedGroups(usize),

    /// No descendant with the given class.
    #[error("no element with class '{0}'")]
    MissingElement(&'static str),

    /// The element exists but its first child is absent or not a text node.
    #[error("element with class '{0}' has no leading text node")]
    MissingText(&'static str),

    /// The status code is not in the status table.
    #[error("unknown status code '{0}'")]
    UnknownStatus(String),
}
