//! Portal credentials loading.
//!
//! Credentials come from a TOML file with a `[user]` table:
//!
//! ```toml
//! [user]
//! name = "someone@example.com"
//! password = "secret"
//! ```
//!
//! A missing file, table or key falls back to an empty string. The
//! `EPS_USER_NAME` / `EPS_USER_PASSWORD` environment variables take precedence
//! over the file when set.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::config::constants::{ENV_USER_NAME, ENV_USER_PASSWORD};
use crate::error_handling::ConfigError;

/// Credentials posted to the portal's login form.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// `user.name`
    #[serde(default)]
    pub name: String,
    /// `user.password`
    #[serde(default)]
    pub password: String,
}

// Never print the password, even at trace level
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    user: Credentials,
}

/// Loads credentials from `path`, then applies environment overrides.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or is not valid TOML.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let credentials = apply_overrides(read_credentials_file(path)?, |key| std::env::var(key).ok());

    if credentials.name.is_empty() {
        log::warn!(
            "No user.name configured in {:?}; the portal will treat every request as logged out",
            path
        );
    }

    Ok(credentials)
}

fn apply_overrides(
    mut credentials: Credentials,
    lookup: impl Fn(&str) -> Option<String>,
) -> Credentials {
    if let Some(name) = lookup(ENV_USER_NAME) {
        credentials.name = name;
    }
    if let Some(password) = lookup(ENV_USER_PASSWORD) {
        credentials.password = password;
    }
    credentials
}

fn read_credentials_file(path: &Path) -> Result<Credentials, ConfigError> {
    if !path.exists() {
        log::warn!("Credentials file {:?} not found, using empty credentials", path);
        return Ok(Credentials::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: CredentialsFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(file.user)
}
