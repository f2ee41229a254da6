//! Page view models and navigation.
//!
//! DESIGN
//! ======
//! A page is mounted by resolving a fresh `SessionSignal` and passing the
//! result through the route gate. Views are plain data with a text
//! rendering; the CLI prints them. `Navigator` follows redirects and keeps
//! the list of mounted routes, which is what a browser history would show.
//!
//! Nothing is cached between mounts, so every navigation re-checks the
//! token with the server.

pub mod application;
pub mod sign_in;
pub mod sign_up;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::fmt;

use crate::forms::{FieldErrors, SignInForm, SignUpForm};
use crate::gate::{self, GateDecision, Route};
use crate::session::{AuthContext, SessionSignal, SessionState};
use application::{ApplicationView, NoticeView};

const MAX_REDIRECTS: usize = 4;

// =============================================================================
// VIEWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub href: Route,
}

/// Form state after a render or a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub errors: FieldErrors,
    /// Message from the server (or transport) shown under the form.
    pub submit_error: Option<String>,
}

impl FormView {
    #[must_use]
    pub fn with_errors(errors: FieldErrors) -> Self {
        Self { errors, submit_error: None }
    }

    #[must_use]
    pub fn with_submit_error(message: String) -> Self {
        Self { errors: FieldErrors::default(), submit_error: Some(message) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Redirect(Route),
    NotAuthenticated(NoticeView),
    Application(ApplicationView),
    SignIn(FormView),
    SignUp(FormView),
}

/// Gate `route` for `state` and build its view.
#[must_use]
pub fn render(route: Route, state: SessionState) -> View {
    match gate::decide(route.kind(), state) {
        GateDecision::Redirect(target) => View::Redirect(target),
        GateDecision::NotAuthenticated { sign_in } => application::not_logged_in(sign_in),
        GateDecision::Render => match route {
            Route::SignIn => View::SignIn(FormView::default()),
            Route::SignUp => View::SignUp(FormView::default()),
            Route::Application => application::welcome(),
        },
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect(route) => write!(f, "Redirecting to {route}"),
            Self::NotAuthenticated(notice) => {
                write!(f, "{} {} ({})", notice.message, notice.link.label, notice.link.href)
            }
            Self::Application(app) => write!(f, "{}\n[{}]", app.heading, app.sign_out_label),
            Self::SignIn(form) => {
                write_form(f, sign_in::TITLE, form)?;
                write!(f, "\nDon't have an account? Sign Up ({})", Route::SignUp)
            }
            Self::SignUp(form) => write_form(f, sign_up::TITLE, form),
        }
    }
}

fn write_form(f: &mut fmt::Formatter<'_>, title: &str, form: &FormView) -> fmt::Result {
    f.write_str(title)?;
    for (field, message) in form.errors.iter() {
        write!(f, "\n  {}: {message}", field.label())?;
    }
    if let Some(message) = &form.submit_error {
        write!(f, "\n  {message}")?;
    }
    Ok(())
}

// =============================================================================
// NAVIGATOR
// =============================================================================

pub struct Navigator {
    ctx: AuthContext,
    history: Vec<Route>,
}

impl Navigator {
    #[must_use]
    pub fn new(ctx: AuthContext) -> Self {
        Self { ctx, history: Vec::new() }
    }

    /// Routes mounted so far, oldest first. Redirect hops are included.
    #[must_use]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.history.last().copied()
    }

    /// Mount `route`, following gate redirects.
    pub async fn open(&mut self, route: Route) -> View {
        let mut route = route;
        let mut view = self.mount(route).await;
        for _ in 0..MAX_REDIRECTS {
            match view {
                View::Redirect(next) => {
                    tracing::debug!(from = %route, to = %next, "redirect");
                    route = next;
                    view = self.mount(route).await;
                }
                other => return other,
            }
        }
        tracing::warn!(%route, "redirect limit reached");
        view
    }

    /// Submit the sign-in form. An already-authenticated session is sent to
    /// the application page without submitting.
    pub async fn submit_sign_in(&mut self, form: SignInForm) -> View {
        let view = self.open(Route::SignIn).await;
        if !matches!(view, View::SignIn(_)) {
            return view;
        }
        match sign_in::submit(&self.ctx, form).await {
            Ok(next) => self.open(next).await,
            Err(form) => View::SignIn(form),
        }
    }

    /// Submit the sign-up form. Same gating as [`Navigator::submit_sign_in`].
    pub async fn submit_sign_up(&mut self, form: SignUpForm) -> View {
        let view = self.open(Route::SignUp).await;
        if !matches!(view, View::SignUp(_)) {
            return view;
        }
        match sign_up::submit(&self.ctx, form).await {
            Ok(next) => self.open(next).await,
            Err(form) => View::SignUp(form),
        }
    }

    /// The application page's sign-out action.
    pub async fn sign_out(&mut self) -> View {
        let next = self.ctx.sign_out();
        self.open(next).await
    }

    async fn mount(&mut self, route: Route) -> View {
        self.history.push(route);
        let mut signal = SessionSignal::new();
        signal.check(&self.ctx).await;
        render(route, signal.state())
    }
}
