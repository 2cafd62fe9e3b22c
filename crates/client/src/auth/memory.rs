//! In-process authentication service.
//!
//! Stores accounts with Argon2id password hashes and reports failures with
//! the same error codes as the hosted service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use teckadm_core::{Email, OwnerId};

use super::{AuthBackend, AuthError, Identity, MIN_PASSWORD_LENGTH, codes};

/// A persisted account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAccount {
    pub identity: Identity,
    pub password_hash: String,
}

/// An in-process [`AuthBackend`].
///
/// Cloning yields another handle to the same accounts and session.
#[derive(Clone)]
pub struct MemoryAuth {
    accounts: Arc<Mutex<HashMap<Email, StoredAccount>>>,
    current: Arc<watch::Sender<Option<Identity>>>,
}

impl MemoryAuth {
    /// No accounts, signed out.
    #[must_use]
    pub fn new() -> Self {
        Self::from_accounts(Vec::new())
    }

    /// Restore previously exported accounts, signed out.
    #[must_use]
    pub fn from_accounts(accounts: Vec<StoredAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.identity.email.clone(), account))
            .collect();
        let (current, _) = watch::channel(None);
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
            current: Arc::new(current),
        }
    }

    /// Every account, for persistence.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the account lock is poisoned.
    pub fn accounts(&self) -> Result<Vec<StoredAccount>, AuthError> {
        let accounts = self.lock()?;
        let mut list: Vec<StoredAccount> = accounts.values().cloned().collect();
        list.sort_by(|a, b| a.identity.email.as_str().cmp(b.identity.email.as_str()));
        Ok(list)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Email, StoredAccount>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::new(codes::INTERNAL, "account store lock poisoned"))
    }

    fn set_current(&self, identity: Option<Identity>) {
        self.current.send_replace(identity);
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAuth")
            .field("current", &*self.current.borrow())
            .finish_non_exhaustive()
    }
}

impl AuthBackend for MemoryAuth {
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Identity, AuthError> {
        let identity = {
            let accounts = self.lock()?;
            let account = accounts.get(email).ok_or_else(invalid_credential)?;
            verify_password(password.expose_secret(), &account.password_hash)?;
            account.identity.clone()
        };

        info!(uid = %identity.uid, "Signed in");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::new(
                codes::WEAK_PASSWORD,
                format!("Password should be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }

        let identity = {
            let mut accounts = self.lock()?;
            if accounts.contains_key(email) {
                return Err(AuthError::new(
                    codes::EMAIL_IN_USE,
                    "The email address is already in use by another account.",
                ));
            }

            let identity = Identity {
                uid: OwnerId::new(Uuid::new_v4().simple().to_string()),
                email: email.clone(),
                display_name: None,
            };
            let password_hash = hash_password(password.expose_secret())?;
            accounts.insert(
                email.clone(),
                StoredAccount {
                    identity: identity.clone(),
                    password_hash,
                },
            );
            identity
        };

        info!(uid = %identity.uid, "Account created");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        debug!("Signing out");
        self.set_current(None);
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

fn invalid_credential() -> AuthError {
    AuthError::new(codes::INVALID_CREDENTIAL, "Invalid email or password.")
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::new(codes::INTERNAL, "password hashing failed"))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| invalid_credential())?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid_credential())
}
