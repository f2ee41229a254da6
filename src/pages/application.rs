//! Application page: the one protected page.

use crate::gate::Route;

use super::{Link, View};

pub const NOT_LOGGED_IN: &str = "You are not logged in. Please sign in to access this page.";
pub const WELCOME: &str = "Welcome to the application.";
pub const SIGN_OUT: &str = "Sign Out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub message: &'static str,
    pub link: Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationView {
    pub heading: &'static str,
    pub sign_out_label: &'static str,
}

pub(super) fn not_logged_in(sign_in: Route) -> View {
    View::NotAuthenticated(NoticeView { message: NOT_LOGGED_IN, link: Link { label: "Sign In", href: sign_in } })
}

pub(super) fn welcome() -> View {
    View::Application(ApplicationView { heading: WELCOME, sign_out_label: SIGN_OUT })
}
