//! Session provider.
//!
//! Wraps the authentication collaborator and exposes the current identity as
//! an observable single value: read it with [`Session::current`], or take a
//! [`SessionChanges`] handle to be told when it changes. Dropping the handle
//! unsubscribes.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, instrument};

use teckadm_core::Email;

use crate::auth::{AuthBackend, AuthError, Identity};

/// Current-identity provider over an [`AuthBackend`].
#[derive(Debug)]
pub struct Session<A> {
    backend: Arc<A>,
}

impl<A> Clone for Session<A> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<A: AuthBackend> Session<A> {
    /// Create a session provider.
    #[must_use]
    pub const fn new(backend: Arc<A>) -> Self {
        Self { backend }
    }

    /// The underlying collaborator.
    #[must_use]
    pub const fn backend(&self) -> &Arc<A> {
        &self.backend
    }

    /// Current identity, or `None` when signed out.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.backend.current()
    }

    /// Subscribe to identity changes.
    #[must_use]
    pub fn changes(&self) -> SessionChanges {
        SessionChanges {
            receiver: self.backend.watch(),
        }
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns the service's error when the credential is rejected.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        let identity = self.backend.sign_in(email, password).await?;
        info!(uid = %identity.uid, "Session started");
        Ok(identity)
    }

    /// Create an account; the new account becomes the current identity.
    ///
    /// # Errors
    ///
    /// Returns the service's error for weak passwords or taken emails.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn create_account(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        let identity = self.backend.create_account(email, password).await?;
        info!(uid = %identity.uid, "Account session started");
        Ok(identity)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns the service's error if the session cannot be ended.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.backend.sign_out().await?;
        info!("Session ended");
        Ok(())
    }
}

/// A subscription to identity changes.
#[derive(Debug)]
pub struct SessionChanges {
    receiver: watch::Receiver<Option<Identity>>,
}

impl SessionChanges {
    /// Wait for the identity to change and return the new value.
    ///
    /// Returns `None` once the authentication service is gone.
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// The new identity if it changed since last seen, without waiting.
    pub fn poll(&mut self) -> Option<Option<Identity>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            Ok(false) | Err(_) => None,
        }
    }

    /// The latest identity, marking it seen.
    pub fn latest(&mut self) -> Option<Identity> {
        self.receiver.borrow_and_update().clone()
    }
}
