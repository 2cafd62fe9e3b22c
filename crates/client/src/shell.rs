//! App shell.
//!
//! Ties the session to the screens. While someone is signed in the shell
//! holds a [`Workspace`] with the three record screens opened for that
//! owner. When the identity changes (sign-out or another account) the old
//! workspace is closed before anything else happens, so no delivery for the
//! previous owner is ever applied afterwards.

use std::sync::Arc;

use tracing::info;

use teckadm_core::{CurrencyCode, OwnerId};

use crate::auth::{AuthBackend, Identity};
use crate::error::{AppError, Operation};
use crate::notice::Notices;
use crate::routing::{Route, RouteGuard};
use crate::screens::{ClientsScreen, QuotesScreen, TicketsScreen};
use crate::session::{Session, SessionChanges};
use crate::store::DocumentStore;

/// The screens of one signed-in owner.
#[derive(Debug)]
pub struct Workspace<S> {
    owner: OwnerId,
    pub clients: ClientsScreen<S>,
    pub tickets: TicketsScreen<S>,
    pub quotes: QuotesScreen<S>,
}

impl<S: DocumentStore> Workspace<S> {
    /// Open every screen for `owner`.
    pub fn open(
        store: &Arc<S>,
        owner: OwnerId,
        notices: &Notices,
        default_currency: CurrencyCode,
    ) -> Self {
        Self {
            clients: ClientsScreen::open(Arc::clone(store), owner.clone(), notices.clone()),
            tickets: TicketsScreen::open(Arc::clone(store), owner.clone(), notices.clone()),
            quotes: QuotesScreen::open(
                Arc::clone(store),
                owner.clone(),
                notices.clone(),
                default_currency,
            ),
            owner,
        }
    }

    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Apply queued deliveries on every screen.
    pub fn sync(&mut self) -> usize {
        self.clients.sync() + self.tickets.sync() + self.quotes.sync()
    }

    /// Close every subscription.
    pub fn close(&mut self) {
        self.clients.close();
        self.tickets.close();
        self.quotes.close();
    }
}

/// Session, route and workspace, kept consistent with each other.
#[derive(Debug)]
pub struct Shell<A, S> {
    session: Session<A>,
    changes: SessionChanges,
    store: Arc<S>,
    notices: Notices,
    default_currency: CurrencyCode,
    guard: RouteGuard,
    workspace: Option<Workspace<S>>,
}

impl<A: AuthBackend, S: DocumentStore> Shell<A, S> {
    /// Build the shell and apply the current identity.
    pub fn new(
        session: Session<A>,
        store: Arc<S>,
        notices: Notices,
        default_currency: CurrencyCode,
    ) -> Self {
        let mut changes = session.changes();
        let identity = changes.latest();
        let mut shell = Self {
            session,
            changes,
            store,
            notices,
            default_currency,
            guard: RouteGuard::new(),
            workspace: None,
        };
        shell.apply_identity(identity.as_ref());
        shell
    }

    #[must_use]
    pub const fn session(&self) -> &Session<A> {
        &self.session
    }

    #[must_use]
    pub const fn route(&self) -> &Route {
        self.guard.route()
    }

    /// Go to `route`, subject to the session guard.
    pub fn navigate(&mut self, route: Route) -> &Route {
        self.guard.navigate(route)
    }

    /// Header label of the signed-in account.
    #[must_use]
    pub fn header_label(&self) -> Option<String> {
        self.session.current().map(|identity| identity.header_label())
    }

    #[must_use]
    pub const fn workspace(&self) -> Option<&Workspace<S>> {
        self.workspace.as_ref()
    }

    pub const fn workspace_mut(&mut self) -> Option<&mut Workspace<S>> {
        self.workspace.as_mut()
    }

    /// Apply a pending identity change, then queued deliveries.
    pub fn sync(&mut self) -> usize {
        if let Some(identity) = self.changes.poll() {
            self.apply_identity(identity.as_ref());
        }
        self.workspace.as_mut().map_or(0, Workspace::sync)
    }

    /// Wait for the identity to change and apply it. Returns `false` once
    /// the authentication service is gone.
    pub async fn next_identity_change(&mut self) -> bool {
        match self.changes.changed().await {
            Some(identity) => {
                self.apply_identity(identity.as_ref());
                true
            }
            None => false,
        }
    }

    /// Sign out and tear the workspace down.
    ///
    /// # Errors
    ///
    /// Returns the service error after showing it; the session is left as
    /// it was.
    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        if let Err(err) = self.session.sign_out().await {
            let err = AppError::from(err);
            self.notices.push(err.notice(Operation::Load));
            return Err(err);
        }
        let identity = self.changes.latest();
        self.apply_identity(identity.as_ref());
        Ok(())
    }

    fn apply_identity(&mut self, identity: Option<&Identity>) {
        let owner = identity.map(|identity| &identity.uid);

        if let Some(workspace) = self.workspace.as_mut()
            && Some(workspace.owner()) != owner
        {
            info!(owner = %workspace.owner(), "Closing workspace");
            workspace.close();
            self.workspace = None;
        }

        if let Some(owner) = owner
            && self.workspace.is_none()
        {
            info!(owner = %owner, "Opening workspace");
            self.workspace = Some(Workspace::open(
                &self.store,
                owner.clone(),
                &self.notices,
                self.default_currency,
            ));
        }

        self.guard.on_identity(identity);
    }
}
