//! Tickets screen.
//!
//! Follows two collections: the owner's clients (for the picker) and the
//! owner's tickets. Both lists are in store order.

use std::sync::Arc;

use tracing::debug;

use teckadm_core::{
    Client, ClientId, Collection, DocumentId, OwnerId, Ticket, TicketId, TicketPriority,
};

use super::{Feed, reported};
use crate::dispatch::MutationDispatcher;
use crate::draft::{DraftMode, TicketDraft};
use crate::error::{AppError, Operation};
use crate::notice::Notices;
use crate::reconcile::ListView;
use crate::store::{DocumentStore, DocumentWrite};

/// List, add, edit, advance and delete tickets.
#[derive(Debug)]
pub struct TicketsScreen<S> {
    clients: Feed<Client>,
    tickets: Feed<Ticket>,
    dispatcher: MutationDispatcher<S>,
    notices: Notices,
    pub draft: TicketDraft,
}

impl<S: DocumentStore> TicketsScreen<S> {
    pub fn open(store: Arc<S>, owner: OwnerId, notices: Notices) -> Self {
        Self {
            clients: Feed::open(store.as_ref(), &owner, None, notices.clone()),
            tickets: Feed::open(store.as_ref(), &owner, None, notices.clone()),
            dispatcher: MutationDispatcher::new(store, owner),
            notices,
            draft: TicketDraft::new(),
        }
    }

    #[must_use]
    pub const fn tickets(&self) -> &ListView<Ticket> {
        self.tickets.view()
    }

    #[must_use]
    pub const fn clients(&self) -> &ListView<Client> {
        self.clients.view()
    }

    /// Loaded once both lists have their first snapshot.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.clients.view().is_loaded() && self.tickets.view().is_loaded()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.clients.is_open() || self.tickets.is_open()
    }

    /// Apply queued deliveries and re-evaluate the picker default.
    pub fn sync(&mut self) -> usize {
        let applied = self.clients.sync() + self.tickets.sync();
        self.draft.picker.reconcile(self.clients.view());
        applied
    }

    /// Wait for the next delivery on either list.
    pub async fn wait_for_update(&mut self) -> bool {
        let clients_open = self.clients.is_open();
        let tickets_open = self.tickets.is_open();
        let progressed = tokio::select! {
            more = self.clients.wait(), if clients_open => more,
            more = self.tickets.wait(), if tickets_open => more,
            else => false,
        };
        self.draft.picker.reconcile(self.clients.view());
        progressed
    }

    /// Select the client for a new ticket.
    pub fn choose_client(&mut self, id: ClientId) {
        self.draft.picker.choose(id);
    }

    /// Text of the client picker.
    #[must_use]
    pub fn picker_label(&self) -> String {
        self.draft.picker.label(self.clients.view())
    }

    /// Start editing `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownRecord`] if the ticket is not listed.
    pub fn begin_edit(&mut self, id: &TicketId) -> Result<(), AppError> {
        let ticket = self.tickets.find(id)?;
        self.draft.begin_edit(ticket);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.draft.reset();
    }

    /// Save the draft. New tickets copy the selected client's current name.
    ///
    /// # Errors
    ///
    /// Returns the validation or store error after showing it.
    pub async fn submit(&mut self) -> Result<TicketId, AppError> {
        let operation = match self.draft.mode {
            DraftMode::Create => Operation::Create,
            DraftMode::Edit(_) => Operation::Update,
        };
        let result = self.save().await;
        let id = reported(&self.notices, operation, result)?;
        self.draft.reset();
        Ok(id)
    }

    async fn save(&self) -> Result<TicketId, AppError> {
        let fields = self.draft.validate(self.clients.view())?;
        match &self.draft.mode {
            DraftMode::Create => {
                let id = self
                    .dispatcher
                    .create(Collection::Tickets, fields.create_write())
                    .await?;
                Ok(id.into())
            }
            DraftMode::Edit(id) => {
                self.dispatcher
                    .update(Collection::Tickets, id.into(), fields.update_write())
                    .await?;
                Ok(id.clone())
            }
        }
    }

    /// Move a ticket to its next status: open, in progress, closed, open.
    /// Only the status is written.
    ///
    /// # Errors
    ///
    /// Returns the lookup or store error after showing it.
    pub async fn advance_status(&mut self, id: &TicketId) -> Result<(), AppError> {
        let result: Result<(), AppError> = async {
            let next = self.tickets.find(id)?.status.advance();
            debug!(id = %id, status = %next, "Advancing ticket");
            let write = DocumentWrite::new().set("estado", next.as_str());
            self.dispatcher
                .update(Collection::Tickets, id.into(), write)
                .await?;
            Ok(())
        }
        .await;
        reported(&self.notices, Operation::Update, result)
    }

    /// Change only the priority of a ticket.
    ///
    /// # Errors
    ///
    /// Returns the store error after showing it.
    pub async fn set_priority(
        &mut self,
        id: &TicketId,
        priority: TicketPriority,
    ) -> Result<(), AppError> {
        let write = DocumentWrite::new().set("prioridad", priority.as_str());
        let result = self
            .dispatcher
            .update(Collection::Tickets, id.into(), write)
            .await
            .map_err(AppError::from);
        reported(&self.notices, Operation::Update, result)
    }

    /// Delete a ticket.
    ///
    /// # Errors
    ///
    /// Returns the store error after showing it.
    pub async fn delete(&mut self, id: &TicketId) -> Result<(), AppError> {
        let result = self
            .dispatcher
            .delete(Collection::Tickets, DocumentId::from(id))
            .await
            .map_err(AppError::from);
        reported(&self.notices, Operation::Delete, result)?;
        if self.draft.mode.editing_id() == Some(id) {
            self.draft.reset();
        }
        Ok(())
    }

    /// Unsubscribe from both lists.
    pub fn close(&mut self) {
        self.clients.close();
        self.tickets.close();
        self.draft = TicketDraft::new();
    }
}
