//! Sign-in form submission.

use crate::forms::SignInForm;
use crate::gate::Route;
use crate::session::AuthContext;

use super::FormView;

pub const TITLE: &str = "Sign In";

/// Validate locally, then submit. On failure the returned form view carries
/// either the field errors or the message to show under the form.
pub(super) async fn submit(ctx: &AuthContext, form: SignInForm) -> Result<Route, FormView> {
    let request = form
        .validate()
        .inspect_err(|errors| tracing::debug!(%errors, "sign-in form has field errors"))
        .map_err(FormView::with_errors)?;
    ctx.sign_in(&request)
        .await
        .map_err(|e| FormView::with_submit_error(e.user_message()))
}
