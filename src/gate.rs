//! Route gate: render-or-redirect decisions per page.
//!
//! Protected pages render only for an authenticated session and show a
//! sign-in notice otherwise. Auth-only pages (the sign-in and sign-up forms)
//! bounce an authenticated session to the application page. An unresolved
//! session counts as unauthenticated everywhere.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::fmt;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    Application,
}

impl Route {
    /// Canonical path. Every redirect and link uses this form.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::Application => "/application",
        }
    }

    /// Resolve a path from the routing table. `/` is the sign-in page.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };
        match normalized {
            "/" | "/signin" => Some(Self::SignIn),
            "/signup" => Some(Self::SignUp),
            "/application" => Some(Self::Application),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind(self) -> PageKind {
        match self {
            Self::SignIn | Self::SignUp => PageKind::AuthOnly,
            Self::Application => PageKind::Protected,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Content requires an authenticated session.
    Protected,
    /// Forms meant only for signed-out visitors.
    AuthOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the page's own content.
    Render,
    /// Protected page without a session: show the notice linking to sign-in.
    NotAuthenticated { sign_in: Route },
    /// Leave the page immediately.
    Redirect(Route),
}

#[must_use]
pub fn decide(kind: PageKind, state: SessionState) -> GateDecision {
    match (kind, state.is_authenticated()) {
        (PageKind::Protected, true) => GateDecision::Render,
        (PageKind::Protected, false) => GateDecision::NotAuthenticated { sign_in: Route::SignIn },
        (PageKind::AuthOnly, true) => GateDecision::Redirect(Route::Application),
        (PageKind::AuthOnly, false) => GateDecision::Render,
    }
}
