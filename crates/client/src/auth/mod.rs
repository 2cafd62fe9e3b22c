//! Authentication collaborator.
//!
//! The hosted authentication service owns accounts and the session
//! lifecycle. The client consumes five operations: sign in, create account,
//! sign out, read the current identity, and watch identity changes.

mod forms;
mod memory;

use std::future::Future;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use teckadm_core::{Email, OwnerId};

pub use forms::{MIN_PASSWORD_LENGTH, SignInForm, SignUpForm};
pub use memory::{MemoryAuth, StoredAccount};

/// Maximum characters of the header identity label.
const HEADER_LABEL_MAX: usize = 22;

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account id; stamped on every record as the owner.
    pub uid: OwnerId,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    /// Short label for the app header: display name, else email, truncated
    /// to 22 characters with an ellipsis.
    #[must_use]
    pub fn header_label(&self) -> String {
        let text = self
            .display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.email.as_str());
        truncate(text, HEADER_LABEL_MAX)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut short: String = text.chars().take(max - 1).collect();
        short.push('…');
        short
    } else {
        text.to_owned()
    }
}

/// Error codes reported by the authentication service.
pub mod codes {
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    pub const WEAK_PASSWORD: &str = "auth/weak-password";
    pub const EMAIL_IN_USE: &str = "auth/email-already-in-use";
    pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
    pub const INTERNAL: &str = "auth/internal-error";
}

/// An authentication failure: a service error code and a message.
///
/// The client never branches on the code; it is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    /// Create an error from a code and message.
    #[must_use]
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_owned(),
            message: message.into(),
        }
    }
}

/// The authentication collaborator.
pub trait AuthBackend: Send + Sync + 'static {
    /// Sign in with an email and password. On success the identity becomes
    /// current and watchers are notified.
    fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Create an account and sign it in.
    fn create_account(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// End the current session.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// The current identity, read synchronously.
    fn current(&self) -> Option<Identity>;

    /// Identity-change notifications. The receiver always holds the latest
    /// value.
    fn watch(&self) -> watch::Receiver<Option<Identity>>;
}
