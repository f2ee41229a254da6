//! Auth API wire types and errors.

use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by auth API calls and the flows built on them.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request never produced an HTTP response (connect, timeout, body read).
    #[error("API request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("API rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// A success response carried no token.
    #[error("API response did not include a token")]
    MissingToken,

    /// The token could not be persisted after a successful sign-in/up.
    #[error("token storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Text shown to the user for a failed sign-in or sign-up.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(cause) => format!("Could not reach the server: {cause}"),
            Self::MissingToken => "Unexpected response from the server.".to_owned(),
            Self::Storage(e) => format!("Could not save your session: {e}"),
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
