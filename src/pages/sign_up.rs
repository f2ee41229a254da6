use crate::forms::SignUpForm;
use crate::gate::Route;
use crate::session::AuthContext;

use super::FormView;

pub const TITLE: &str = "Sign Up";

pub(super) async fn submit(ctx: &AuthContext, form: SignUpForm) -> Result<Route, FormView> {
    let request = form
        .validate()
        .inspect_err(|errors| tracing::debug!(%errors, "sign-up form has field errors"))
        .map_err(FormView::with_errors)?;
    ctx.sign_up(&request)
        .await
        .map_err(|e| FormView::with_submit_error(e.user_message()))
}
