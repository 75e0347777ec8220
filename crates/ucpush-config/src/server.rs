//! Deployment server connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable holding the server URL.
pub const ENV_URL: &str = "UCPUSH_URL";
/// Environment variable holding the user name.
pub const ENV_USER: &str = "UCPUSH_USER";
/// Environment variable holding the password or auth token.
pub const ENV_PASSWORD: &str = "UCPUSH_PASSWORD";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// The `[server]` table of a request file. Credentials are never read from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Fully resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL without a trailing slash.
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

/// Values given on the command line, which beat everything else.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub url: Option<String>,
    pub user: Option<String>,
}

impl ServerConfig {
    /// Resolve settings from CLI overrides, the request file, and the environment, in that order.
    ///
    /// `env` looks up an environment variable; pass `|k| std::env::var(k).ok()` outside tests.
    ///
    /// # Errors
    /// Returns `ServerError::MissingUrl` if no source provides a server URL.
    pub fn resolve(
        section: Option<&ServerSection>,
        overrides: &ServerOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServerError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let url = non_blank(overrides.url.clone())
            .or_else(|| non_blank(section.and_then(|s| s.url.clone())))
            .or_else(|| non_blank(env(ENV_URL)))
            .ok_or(ServerError::MissingUrl)?;
        let user = non_blank(overrides.user.clone())
            .or_else(|| non_blank(section.and_then(|s| s.user.clone())))
            .or_else(|| non_blank(env(ENV_USER)));
        let password = env(ENV_PASSWORD);

        let connect_timeout = section
            .and_then(|s| s.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let timeout = section
            .and_then(|s| s.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            url: url.trim().trim_end_matches('/').to_owned(),
            user,
            password,
            connect_timeout: Duration::from_secs(connect_timeout),
            timeout: Duration::from_secs(timeout),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("no server URL configured — pass --url, set [server].url, or export {ENV_URL}")]
    MissingUrl,
}
