//! Integration tests for TeckAdm.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p teckadm-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_routing` - Sign-up rules, route guard, workspace teardown
//! - `clients_flow` - Client screen against the in-memory store
//! - `tickets_flow` - Tickets, status cycle and the client picker
//! - `quotes_flow` - Line items, totals and confirmed deletes
//!
//! Everything runs in-process against [`MemoryAuth`] and [`MemoryStore`];
//! no external service is needed.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::Arc;

use secrecy::SecretString;

use teckadm_client::auth::{Identity, MemoryAuth};
use teckadm_client::session::Session;
use teckadm_client::shell::Shell;
use teckadm_client::store::MemoryStore;
use teckadm_client::{NoticeReceiver, Notices};
use teckadm_core::{CurrencyCode, Email};

/// Password every test account uses.
pub const PASSWORD: &str = "secreto1";

/// Shared collaborators for one test.
pub struct TestApp {
    pub auth: Arc<MemoryAuth>,
    pub store: Arc<MemoryStore>,
    pub session: Session<MemoryAuth>,
    pub notices: Notices,
    pub shown: NoticeReceiver,
}

impl TestApp {
    /// Fresh collaborators, signed out.
    #[must_use]
    pub fn new() -> Self {
        let auth = Arc::new(MemoryAuth::new());
        let (notices, shown) = Notices::channel();
        Self {
            session: Session::new(Arc::clone(&auth)),
            auth,
            store: Arc::new(MemoryStore::new()),
            notices,
            shown,
        }
    }

    /// Create `email` with [`PASSWORD`]; it becomes the current identity.
    pub async fn sign_up(&self, email: &str) -> Identity {
        let email = Email::parse(email).expect("valid test email");
        self.session
            .create_account(&email, &password())
            .await
            .expect("account created")
    }

    /// Sign `email` back in.
    pub async fn sign_in(&self, email: &str) -> Identity {
        let email = Email::parse(email).expect("valid test email");
        self.session
            .sign_in(&email, &password())
            .await
            .expect("signed in")
    }

    /// A shell over these collaborators, pricing in MXN.
    #[must_use]
    pub fn shell(&self) -> Shell<MemoryAuth, MemoryStore> {
        Shell::new(
            self.session.clone(),
            Arc::clone(&self.store),
            self.notices.clone(),
            CurrencyCode::MXN,
        )
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// [`PASSWORD`] as a secret.
#[must_use]
pub fn password() -> SecretString {
    SecretString::from(PASSWORD.to_owned())
}
