//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOKEN_FILE: &str = ".gatehouse/storage.json";

pub const ENV_API_URL: &str = "GATEHOUSE_API_URL";
pub const ENV_SIGNUP_ENDPOINT: &str = "GATEHOUSE_SIGNUP_ENDPOINT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "GATEHOUSE_REQUEST_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "GATEHOUSE_CONNECT_TIMEOUT_SECS";
pub const ENV_TOKEN_FILE: &str = "GATEHOUSE_TOKEN_FILE";

/// Errors produced while building the client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing API base URL; pass --api-url or set GATEHOUSE_API_URL")]
    MissingBaseUrl,

    #[error("unknown sign-up endpoint '{0}' (expected 'auth' or 'users')")]
    InvalidSignUpEndpoint(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Which account-creation endpoint the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignUpEndpoint {
    /// `POST /auth/signup`
    #[default]
    Auth,
    /// `POST /users`
    Users,
}

impl SignUpEndpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Auth => "/auth/signup",
            Self::Users => "/users",
        }
    }
}

impl std::str::FromStr for SignUpEndpoint {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auth" => Ok(Self::Auth),
            "users" => Ok(Self::Users),
            _ => Err(ConfigError::InvalidSignUpEndpoint(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the auth API, without a trailing slash.
    pub base_url: String,
    pub signup_endpoint: SignUpEndpoint,
    pub timeouts: ApiTimeouts,
    /// Location of the file-backed token storage.
    pub token_file: PathBuf,
}

impl ApiConfig {
    /// Config with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            signup_endpoint: SignUpEndpoint::default(),
            timeouts: ApiTimeouts::default(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `GATEHOUSE_API_URL`
    ///
    /// Optional:
    /// - `GATEHOUSE_SIGNUP_ENDPOINT`: `auth` (default) or `users`
    /// - `GATEHOUSE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `GATEHOUSE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `GATEHOUSE_TOKEN_FILE`: default `.gatehouse/storage.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or the sign-up endpoint is
    /// not recognized.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// The CLI layers its flags over the process environment through this.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_API_URL)
            .map(|raw| normalize_base_url(&raw))
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        let signup_endpoint = match lookup(ENV_SIGNUP_ENDPOINT) {
            Some(raw) => raw.parse()?,
            None => SignUpEndpoint::default(),
        };

        let timeouts = ApiTimeouts {
            request_secs: parse_u64(lookup(ENV_REQUEST_TIMEOUT_SECS), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup(ENV_CONNECT_TIMEOUT_SECS), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let token_file = lookup(ENV_TOKEN_FILE)
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);

        Ok(Self { base_url, signup_endpoint, timeouts, token_file })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
