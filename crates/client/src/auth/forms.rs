//! Sign-in and sign-up forms.
//!
//! Submitting takes `&mut self`, so a form cannot be submitted again while
//! its previous submission is still in flight. On failure the form keeps
//! what the user typed and a notice is pushed.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use teckadm_core::Email;

use super::{AuthBackend, Identity};
use crate::draft::ValidationError;
use crate::error::{AppError, Operation};
use crate::notice::Notices;
use crate::session::Session;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// The sign-in screen.
#[derive(Debug)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
    notices: Notices,
}

impl SignInForm {
    #[must_use]
    pub fn new(notices: Notices) -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
            notices,
        }
    }

    /// Sign in with the entered credentials.
    ///
    /// # Errors
    ///
    /// Returns the validation or authentication error after showing it.
    pub async fn submit<A: AuthBackend>(
        &mut self,
        session: &Session<A>,
    ) -> Result<Identity, AppError> {
        let result: Result<Identity, AppError> = async {
            let email = Email::parse(&self.email).map_err(ValidationError::from)?;
            Ok(session.sign_in(&email, &self.password).await?)
        }
        .await;

        result.inspect_err(|err| {
            debug!(error = %err, "Sign-in failed");
            self.notices.push(err.notice(Operation::SignIn));
        })
    }
}

/// The sign-up screen.
#[derive(Debug)]
pub struct SignUpForm {
    pub email: String,
    pub password: SecretString,
    pub confirm: SecretString,
    notices: Notices,
}

impl SignUpForm {
    #[must_use]
    pub fn new(notices: Notices) -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
            confirm: SecretString::from(String::new()),
            notices,
        }
    }

    /// Check the form: password length, then confirmation, then email.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        let password = self.password.expose_secret();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        if password != self.confirm.expose_secret() {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(Email::parse(&self.email)?)
    }

    /// Create the account; on success it becomes the current identity.
    ///
    /// # Errors
    ///
    /// Returns the validation or authentication error after showing it.
    pub async fn submit<A: AuthBackend>(
        &mut self,
        session: &Session<A>,
    ) -> Result<Identity, AppError> {
        let result: Result<Identity, AppError> = async {
            let email = self.validate()?;
            Ok(session.create_account(&email, &self.password).await?)
        }
        .await;

        result.inspect_err(|err| {
            debug!(error = %err, "Sign-up failed");
            self.notices.push(err.notice(Operation::SignUp));
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::MemoryAuth;
    use crate::notice::NoticeLevel;

    fn sign_up(email: &str, password: &str, confirm: &str) -> SignUpForm {
        let mut form = SignUpForm::new(Notices::discard());
        form.email = email.to_owned();
        form.password = SecretString::from(password.to_owned());
        form.confirm = SecretString::from(confirm.to_owned());
        form
    }

    #[test]
    fn test_sign_up_rule_order() {
        assert_eq!(
            sign_up("no-es-email", "12345", "x").validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            sign_up("no-es-email", "123456", "654321").validate(),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(matches!(
            sign_up("no-es-email", "123456", "123456").validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(sign_up("ana@taller.mx", "123456", "123456").validate().is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_failure_keeps_form_and_notifies() {
        let session = Session::new(Arc::new(MemoryAuth::new()));
        let (notices, mut receiver) = Notices::channel();
        let mut form = SignInForm::new(notices);
        form.email = "ana@taller.mx".into();
        form.password = SecretString::from("secreto1".to_owned());

        assert!(form.submit(&session).await.is_err());
        assert_eq!(form.email, "ana@taller.mx");

        let shown = receiver.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].level, NoticeLevel::Error);
        assert_eq!(shown[0].title, "Error al iniciar sesión");
        assert!(shown[0].message.starts_with("auth/invalid-credential\n"));
    }
}
