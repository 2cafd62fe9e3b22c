//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! teckadm signup
//! teckadm signup -e otra@taller.mx
//! teckadm whoami
//! ```

use tracing::info;

use teckadm_client::Notices;
use teckadm_client::auth::SignUpForm;

use super::{CliError, Context, emit};

/// Create an account with the configured password.
///
/// # Errors
///
/// Returns an error if the password is missing or rejected, or the email
/// is taken.
pub async fn sign_up(email: Option<String>) -> Result<(), CliError> {
    let ctx = Context::load().await?;
    let credentials = ctx
        .config
        .credentials
        .clone()
        .ok_or(CliError::MissingCredentials)?;

    let mut form = SignUpForm::new(Notices::discard());
    form.email = email.unwrap_or_else(|| credentials.email.to_string());
    form.confirm = credentials.password.clone();
    form.password = credentials.password;

    let outcome: Result<(), CliError> = async {
        let identity = form.submit(ctx.shell.session()).await?;
        info!(uid = %identity.uid, "Account created");
        emit(format_args!("{} ({})", identity.email, identity.uid))
    }
    .await;
    ctx.finish(outcome).await
}

/// Print the signed-in account.
///
/// # Errors
///
/// Returns an error if signing in fails.
pub async fn whoami() -> Result<(), CliError> {
    let ctx = Context::signed_in().await?;
    let outcome = ctx
        .shell
        .header_label()
        .ok_or(CliError::NotSignedIn)
        .and_then(|label| emit(format_args!("{label} -> {}", ctx.shell.route())));
    ctx.finish(outcome).await
}
