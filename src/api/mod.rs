//! Auth API client.
//!
//! DESIGN
//! ======
//! `AuthApi` is the seam between session logic and the network. The real
//! implementation is a thin `reqwest` wrapper; tests swap in fakes. Body
//! interpretation lives in pure functions (`parse_token`,
//! `rejection_message`) so it can be tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! Anything that is not a 2xx response is an `AuthError`. The server's
//! `message` field is carried through verbatim when present so the user sees
//! exactly what the server said.

pub mod types;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use crate::config::{ApiConfig, ConfigError, SignUpEndpoint};
pub use types::{AuthError, SignInRequest, SignUpRequest};
use types::{ErrorResponse, TokenResponse};

pub const VALIDATE_PATH: &str = "/auth/validate";
pub const SIGNIN_PATH: &str = "/auth/signin";

// =============================================================================
// AUTH API TRAIT
// =============================================================================

/// Remote authentication service. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Ask the server whether `token` is still valid.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on transport failure or a non-2xx status.
    async fn validate(&self, token: &str) -> Result<(), AuthError>;

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on transport failure, a non-2xx status, or a
    /// success response without a token.
    async fn sign_in(&self, request: &SignInRequest) -> Result<String, AuthError>;

    /// Create an account and return its token.
    ///
    /// # Errors
    ///
    /// Same as [`AuthApi::sign_in`].
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, AuthError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
    signup_endpoint: SignUpEndpoint,
}

impl HttpAuthApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), signup_endpoint: config.signup_endpoint })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_for_token<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, AuthError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !is_success(status) {
            return Err(AuthError::Rejected { status, message: rejection_message(status, &text) });
        }

        parse_token(&text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn validate(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .get(self.url(VALIDATE_PATH))
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if is_success(status) {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(AuthError::Rejected { status, message: rejection_message(status, &text) })
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<String, AuthError> {
        self.post_for_token(SIGNIN_PATH, request).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, AuthError> {
        self.post_for_token(self.signup_endpoint.path(), request).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn parse_token(body: &str) -> Result<String, AuthError> {
    serde_json::from_str::<TokenResponse>(body)
        .ok()
        .and_then(|r| r.token)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

fn rejection_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}
