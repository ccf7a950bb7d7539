//! Runtime settings read from the environment
//!
//! A `.env` file in the working directory is loaded first, then the process
//! environment is read. `uri` names the database: a local file path or a
//! `libsql://` / `http(s)://` URL. `auth_token` is passed along for remote databases.

use crate::error::Error as CrateError;
use thiserror::Error;
use tracing::debug;

/// Variable holding the database connection string
pub const URI_VAR: &str = "uri";

/// Variable holding the optional remote database token
pub const AUTH_TOKEN_VAR: &str = "auth_token";

/// Error type for settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A required variable is unset or blank
    #[error("environment variable `{0}` is not set")]
    Missing(&'static str),
}

impl From<SettingsError> for CrateError {
    fn from(err: SettingsError) -> Self {
        CrateError::Config(err.to_string())
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Local path or remote URL of the database
    pub uri: String,
    /// Token for remote databases
    pub auth_token: Option<String>,
}

/// Load `.env` from the working directory into the process environment, if present
///
/// Variables already set in the process take precedence.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded: {}", e),
    }
}

impl Settings {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        load_dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through a lookup function, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let uri = non_blank(URI_VAR).ok_or(SettingsError::Missing(URI_VAR))?;
        Ok(Self {
            uri,
            auth_token: non_blank(AUTH_TOKEN_VAR),
        })
    }
}
