//! Quotes screen.
//!
//! Both the client list and the quote list are requested newest first.
//! Deleting a quote takes two steps: [`QuotesScreen::request_delete`]
//! returns a [`DeletePrompt`] for the user to confirm, and only
//! [`QuotesScreen::confirm_delete`] issues the delete.

use std::sync::Arc;

use teckadm_core::{
    Client, ClientId, Collection, CurrencyCode, DocumentId, OwnerId, Quote, QuoteId,
};

use super::{Feed, reported};
use crate::dispatch::MutationDispatcher;
use crate::draft::{DraftMode, QuoteDraft};
use crate::error::{AppError, Operation};
use crate::notice::{Notice, Notices};
use crate::reconcile::ListView;
use crate::store::{DocumentStore, OrderBy};

/// A pending delete, waiting for the user's confirmation.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a delete prompt does nothing until confirmed"]
pub struct DeletePrompt {
    id: QuoteId,
}

impl DeletePrompt {
    pub const TITLE: &'static str = "Eliminar";
    pub const MESSAGE: &'static str = "¿Eliminar la cotización?";

    /// Quote that would be deleted.
    pub const fn id(&self) -> &QuoteId {
        &self.id
    }
}

/// List, add, edit and delete quotes.
#[derive(Debug)]
pub struct QuotesScreen<S> {
    clients: Feed<Client>,
    quotes: Feed<Quote>,
    dispatcher: MutationDispatcher<S>,
    notices: Notices,
    pub draft: QuoteDraft,
}

impl<S: DocumentStore> QuotesScreen<S> {
    /// Open the screen; new quotes start in `default_currency`.
    pub fn open(
        store: Arc<S>,
        owner: OwnerId,
        notices: Notices,
        default_currency: CurrencyCode,
    ) -> Self {
        let order = Some(OrderBy::NEWEST_FIRST);
        Self {
            clients: Feed::open(store.as_ref(), &owner, order, notices.clone()),
            quotes: Feed::open(store.as_ref(), &owner, order, notices.clone()),
            dispatcher: MutationDispatcher::new(store, owner),
            notices,
            draft: QuoteDraft::new(default_currency),
        }
    }

    #[must_use]
    pub const fn quotes(&self) -> &ListView<Quote> {
        self.quotes.view()
    }

    #[must_use]
    pub const fn clients(&self) -> &ListView<Client> {
        self.clients.view()
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.clients.view().is_loaded() && self.quotes.view().is_loaded()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.clients.is_open() || self.quotes.is_open()
    }

    /// Apply queued deliveries and re-evaluate the picker default.
    pub fn sync(&mut self) -> usize {
        let applied = self.clients.sync() + self.quotes.sync();
        self.draft.picker.reconcile(self.clients.view());
        applied
    }

    /// Wait for the next delivery on either list.
    pub async fn wait_for_update(&mut self) -> bool {
        let clients_open = self.clients.is_open();
        let quotes_open = self.quotes.is_open();
        let progressed = tokio::select! {
            more = self.clients.wait(), if clients_open => more,
            more = self.quotes.wait(), if quotes_open => more,
            else => false,
        };
        self.draft.picker.reconcile(self.clients.view());
        progressed
    }

    pub fn choose_client(&mut self, id: ClientId) {
        self.draft.picker.choose(id);
    }

    #[must_use]
    pub fn picker_label(&self) -> String {
        self.draft.picker.label(self.clients.view())
    }

    /// Name of a quote's client for the list, or the client id if that
    /// client is gone.
    #[must_use]
    pub fn client_label(&self, quote: &Quote) -> String {
        self.clients
            .view()
            .get(&quote.client_id)
            .map_or_else(|| quote.client_id.to_string(), |c| c.name.clone())
    }

    /// Start editing `id`; the picker switches to the quote's client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownRecord`] if the quote is not listed.
    pub fn begin_edit(&mut self, id: &QuoteId) -> Result<(), AppError> {
        let quote = self.quotes.find(id)?;
        self.draft.begin_edit(quote);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.draft.reset();
    }

    /// Save the draft and confirm with a success notice.
    ///
    /// # Errors
    ///
    /// Returns the validation or store error after showing it.
    pub async fn submit(&mut self) -> Result<QuoteId, AppError> {
        let (operation, confirmation) = match self.draft.mode {
            DraftMode::Create => (Operation::Create, "Cotización creada."),
            DraftMode::Edit(_) => (Operation::Update, "Cotización actualizada."),
        };
        let result = self.save().await;
        let id = reported(&self.notices, operation, result)?;
        self.notices.push(Notice::success("Éxito", confirmation));
        self.draft.reset();
        Ok(id)
    }

    async fn save(&self) -> Result<QuoteId, AppError> {
        let fields = self.draft.validate()?;
        match &self.draft.mode {
            DraftMode::Create => {
                let id = self
                    .dispatcher
                    .create(Collection::Quotes, fields.to_write())
                    .await?;
                Ok(id.into())
            }
            DraftMode::Edit(id) => {
                self.dispatcher
                    .update(Collection::Quotes, id.into(), fields.to_write())
                    .await?;
                Ok(id.clone())
            }
        }
    }

    /// Ask before deleting `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownRecord`] if the quote is not listed.
    pub fn request_delete(&self, id: &QuoteId) -> Result<DeletePrompt, AppError> {
        let quote = self.quotes.find(id)?;
        Ok(DeletePrompt {
            id: quote.id.clone(),
        })
    }

    /// Delete the quote the user confirmed.
    ///
    /// # Errors
    ///
    /// Returns the store error after showing it.
    pub async fn confirm_delete(&mut self, prompt: DeletePrompt) -> Result<(), AppError> {
        let result = self
            .dispatcher
            .delete(Collection::Quotes, DocumentId::from(&prompt.id))
            .await
            .map_err(AppError::from);
        reported(&self.notices, Operation::Delete, result)?;
        if self.draft.mode.editing_id() == Some(&prompt.id) {
            self.draft.reset();
        }
        Ok(())
    }

    /// Unsubscribe from both lists.
    pub fn close(&mut self) {
        self.clients.close();
        self.quotes.close();
        self.draft = QuoteDraft::new(self.draft.default_currency());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::notice::NoticeLevel;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_create_confirms_and_lists_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let (notices, mut shown) = Notices::channel();
        let mut screen = QuotesScreen::open(
            Arc::clone(&store),
            OwnerId::new("U1"),
            notices,
            CurrencyCode::MXN,
        );
        screen.sync();
        screen.choose_client(ClientId::new("c1"));

        for description in ["Primero", "Segundo"] {
            screen.draft.set_description(0, description);
            screen.draft.set_price(0, "100");
            screen.submit().await.unwrap();
        }
        screen.sync();

        let quotes = screen.quotes();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes.records()[0].items[0].description, "Segundo");
        assert_eq!(quotes.records()[0].total, Decimal::new(100, 0));
        assert_eq!(screen.client_label(&quotes.records()[0]), "c1");

        let notices = shown.drain();
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].message, "Cotización creada.");
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let store = Arc::new(MemoryStore::new());
        let mut screen = QuotesScreen::open(
            Arc::clone(&store),
            OwnerId::new("U1"),
            Notices::discard(),
            CurrencyCode::USD,
        );
        screen.choose_client(ClientId::new("c1"));
        screen.draft.set_description(0, "Cable");
        let id = screen.submit().await.unwrap();
        screen.sync();

        let prompt = screen.request_delete(&id).unwrap();
        assert_eq!(prompt.id(), &id);
        screen.sync();
        assert_eq!(screen.quotes().len(), 1);

        screen.confirm_delete(prompt).await.unwrap();
        screen.sync();
        assert!(screen.quotes().is_empty());
    }
}
