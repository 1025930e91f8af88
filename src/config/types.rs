//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BASE_URL, DEFAULT_BIND_ADDR, DEFAULT_CONFIG_PATH, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Serve on the default port with credentials from ./config.toml
/// eps_tracker
///
/// # Custom credentials file and port
/// eps_tracker --config /etc/eps/config.toml --port 9000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "eps_tracker",
    about = "Serves EPS package tracking status as JSON."
)]
pub struct Opt {
    /// Credentials file (TOML with a [user] table holding name and password)
    #[arg(long, value_parser, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Address the HTTP server binds to
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Port the HTTP server listens on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Base URL of the EPS portal
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request upstream timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use eps_tracker::Config;
///
/// let config = Config {
///     port: 9000,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Credentials file
    pub config_path: PathBuf,

    /// Address the HTTP server binds to
    pub bind: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Base URL of the EPS portal (login and tracking paths are joined onto it)
    pub base_url: String,

    /// Per-request upstream timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            bind: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            config_path: opt.config,
            bind: opt.bind,
            port: opt.port,
            base_url: opt.base_url,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
