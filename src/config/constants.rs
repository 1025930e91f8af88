//! Configuration constants.
//!
//! This module defines the constants used throughout the service, including
//! upstream portal paths, the cache window and redirect limits.

/// Default base URL of the EPS portal
pub const DEFAULT_BASE_URL: &str = "https://app.eps-int.com";

/// Path of the login form (credentials are POSTed here once at startup)
pub const LOGIN_PATH: &str = "/login";

/// Path of the tracking page that lists every package on the account
pub const TRACKING_PATH: &str = "/TrackingPaquetes";

/// Default credentials file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable overriding `user.name` from the credentials file
pub const ENV_USER_NAME: &str = "EPS_USER_NAME";
/// Environment variable overriding `user.password` from the credentials file
pub const ENV_USER_PASSWORD: &str = "EPS_USER_PASSWORD";

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port for the HTTP server
pub const DEFAULT_PORT: u16 = 8000;

/// Per-request upstream timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Cache
/// Age (in minutes) after which the cached tracking page is stale.
/// The comparison is strict: exactly one minute is still fresh.
pub const CACHE_WINDOW_MINUTES: f64 = 1.0;

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops between the tracking page and the login portal
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default User-Agent string for HTTP requests.
///
/// The portal serves the same markup to any browser-like agent. Users can
/// override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
