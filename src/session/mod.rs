//! Session resolution and the sign-in / sign-up / sign-out flows.
//!
//! ARCHITECTURE
//! ============
//! `AuthContext` bundles the two injected capabilities (token storage and
//! the auth API). `resolve` answers "is the current user authenticated?"
//! with at most one validation round trip. `SessionSignal` is the per-page
//! holder of that answer; it starts `Unresolved` on every mount.
//!
//! ERROR HANDLING
//! ==============
//! Resolution never fails. A missing token, an unreadable store, a rejected
//! token and a transport error all resolve to `Unauthenticated`; the last
//! three are logged. A rejected token is left in storage.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::sync::Arc;

use crate::api::{AuthApi, AuthError, SignInRequest, SignUpRequest};
use crate::gate::Route;
use crate::storage::{TOKEN_KEY, TokenStore};

// =============================================================================
// SESSION STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Check not finished yet. Gated like `Unauthenticated`.
    #[default]
    Unresolved,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

// =============================================================================
// AUTH CONTEXT
// =============================================================================

#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    api: Arc<dyn AuthApi>,
}

impl AuthContext {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    /// Is the current user authenticated?
    ///
    /// No network call is made when no token is stored.
    pub async fn resolve(&self) -> SessionState {
        let Some(token) = self.read_token() else {
            tracing::debug!("no credential token stored");
            return SessionState::Unauthenticated;
        };

        match self.api.validate(&token).await {
            Ok(()) => SessionState::Authenticated,
            Err(e) => {
                tracing::warn!(error = %e, "credential token validation failed");
                SessionState::Unauthenticated
            }
        }
    }

    /// Submit credentials, persist the returned token, and name the page to
    /// navigate to.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] from the API, or a storage error if the
    /// token could not be saved. Nothing is stored on failure.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<Route, AuthError> {
        let token = self
            .api
            .sign_in(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "sign-in failed"))?;
        self.store_token(&token)?;
        tracing::info!("signed in");
        Ok(Route::Application)
    }

    /// Create an account, persist the returned token, and name the page to
    /// navigate to.
    ///
    /// # Errors
    ///
    /// Same as [`AuthContext::sign_in`].
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<Route, AuthError> {
        let token = self
            .api
            .sign_up(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "sign-up failed"))?;
        self.store_token(&token)?;
        tracing::info!("signed up");
        Ok(Route::Application)
    }

    /// Forget the stored token and name the page to navigate to.
    ///
    /// Never fails: removing an absent token is a no-op and a storage error
    /// is only logged.
    pub fn sign_out(&self) -> Route {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove credential token");
        } else {
            tracing::info!("signed out");
        }
        Route::SignIn
    }

    fn read_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "token storage unavailable; treating session as signed out");
                None
            }
        }
    }

    fn store_token(&self, token: &str) -> Result<(), AuthError> {
        self.store
            .set(TOKEN_KEY, token)
            .inspect_err(|e| tracing::error!(error = %e, "failed to persist credential token"))?;
        Ok(())
    }
}

// =============================================================================
// SESSION SIGNAL
// =============================================================================

/// Per-page session signal.
///
/// A check needs `&mut self`, so one page never runs two checks at once.
#[derive(Debug, Default)]
pub struct SessionSignal {
    state: SessionState,
}

impl SessionSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one check to completion and store the result.
    pub async fn check(&mut self, ctx: &AuthContext) -> SessionState {
        self.state = SessionState::Unresolved;
        self.state = ctx.resolve().await;
        self.state
    }
}
