//! Clients screen.

use std::sync::Arc;

use tracing::debug;

use teckadm_core::{Client, ClientId, Collection, DocumentId, OwnerId};

use super::{Feed, reported};
use crate::dispatch::MutationDispatcher;
use crate::draft::{ClientDraft, DraftMode};
use crate::error::{AppError, Operation};
use crate::notice::Notices;
use crate::reconcile::ListView;
use crate::store::DocumentStore;

/// List, add, edit and delete clients.
#[derive(Debug)]
pub struct ClientsScreen<S> {
    clients: Feed<Client>,
    dispatcher: MutationDispatcher<S>,
    notices: Notices,
    pub draft: ClientDraft,
}

impl<S: DocumentStore> ClientsScreen<S> {
    /// Open the screen for `owner`. The list is in store order.
    pub fn open(store: Arc<S>, owner: OwnerId, notices: Notices) -> Self {
        Self {
            clients: Feed::open(store.as_ref(), &owner, None, notices.clone()),
            dispatcher: MutationDispatcher::new(store, owner),
            notices,
            draft: ClientDraft::new(),
        }
    }

    #[must_use]
    pub const fn clients(&self) -> &ListView<Client> {
        self.clients.view()
    }

    /// Whether the first snapshot has arrived.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.clients.view().is_loaded()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.clients.is_open()
    }

    /// Apply queued deliveries.
    pub fn sync(&mut self) -> usize {
        self.clients.sync()
    }

    /// Wait for the next delivery of the client list.
    pub async fn wait_for_update(&mut self) -> bool {
        self.clients.wait().await
    }

    /// Start editing `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownRecord`] if the client is not listed.
    pub fn begin_edit(&mut self, id: &ClientId) -> Result<(), AppError> {
        let client = self.clients.find(id)?;
        self.draft.begin_edit(client);
        Ok(())
    }

    /// Drop the edit and clear the form.
    pub fn cancel_edit(&mut self) {
        self.draft.reset();
    }

    /// Save the draft: insert in create mode, update in edit mode.
    ///
    /// On success the form is cleared. On failure a notice is shown and the
    /// draft is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the validation or store error.
    pub async fn submit(&mut self) -> Result<ClientId, AppError> {
        let operation = match self.draft.mode {
            DraftMode::Create => Operation::Create,
            DraftMode::Edit(_) => Operation::Update,
        };
        let result = self.save().await;
        let id = reported(&self.notices, operation, result)?;
        self.draft.reset();
        Ok(id)
    }

    async fn save(&self) -> Result<ClientId, AppError> {
        let fields = self.draft.validate()?;
        match &self.draft.mode {
            DraftMode::Create => {
                let id = self
                    .dispatcher
                    .create(Collection::Clients, fields.to_write())
                    .await?;
                Ok(id.into())
            }
            DraftMode::Edit(id) => {
                self.dispatcher
                    .update(Collection::Clients, id.into(), fields.to_write())
                    .await?;
                Ok(id.clone())
            }
        }
    }

    /// Delete a client. Its tickets and quotes are left alone.
    ///
    /// # Errors
    ///
    /// Returns the store error after showing it.
    pub async fn delete(&mut self, id: &ClientId) -> Result<(), AppError> {
        let result = self
            .dispatcher
            .delete(Collection::Clients, DocumentId::from(id))
            .await
            .map_err(AppError::from);
        reported(&self.notices, Operation::Delete, result)?;
        if self.draft.mode.editing_id() == Some(id) {
            debug!(id = %id, "Edited client deleted; clearing form");
            self.draft.reset();
        }
        Ok(())
    }

    /// Unsubscribe. No delivery is applied after this.
    pub fn close(&mut self) {
        self.clients.close();
        self.draft.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::store::{DocumentWrite, MemoryStore, StoreError};

    fn screen() -> (
        Arc<MemoryStore>,
        ClientsScreen<MemoryStore>,
        crate::notice::NoticeReceiver,
    ) {
        let store = Arc::new(MemoryStore::new());
        let (notices, receiver) = Notices::channel();
        let screen = ClientsScreen::open(Arc::clone(&store), OwnerId::new("U1"), notices);
        (store, screen, receiver)
    }

    #[tokio::test]
    async fn test_add_then_edit() {
        let (_store, mut screen, _notices) = screen();
        screen.sync();
        assert!(screen.is_loaded());
        assert!(screen.clients().is_empty());

        screen.draft.name = "Acme".into();
        screen.draft.phone = "555-1111".into();
        let id = screen.submit().await.unwrap();
        assert_eq!(screen.draft, ClientDraft::new());

        screen.sync();
        assert_eq!(screen.clients().len(), 1);

        screen.begin_edit(&id).unwrap();
        screen.draft.name = "Acme SA".into();
        screen.submit().await.unwrap();
        screen.sync();

        let client = screen.clients().get(&id).unwrap();
        assert_eq!(client.name, "Acme SA");
        assert_eq!(client.phone.as_deref(), Some("555-1111"));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let (store, mut screen, mut notices) = screen();
        store.fail_next_write(StoreError::Unavailable("offline".into()));

        screen.draft.name = "Acme".into();
        assert!(screen.submit().await.is_err());
        assert_eq!(screen.draft.name, "Acme");

        let shown = notices.drain();
        assert_eq!(shown[0].title, "Error al agregar");
        assert_eq!(shown[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_blank_name_never_reaches_store() {
        let (store, mut screen, mut notices) = screen();
        screen.draft.name = "  ".into();
        assert!(matches!(screen.submit().await, Err(AppError::Validation(_))));
        assert!(store.snapshot().unwrap()["clientes"].is_empty());
        assert_eq!(notices.drain()[0].title, "Falta el nombre");
    }

    #[tokio::test]
    async fn test_wait_for_update_applies_deliveries() {
        let (store, mut screen, _notices) = screen();
        assert!(screen.wait_for_update().await);
        assert!(screen.is_loaded());

        let writer = MutationDispatcher::new(Arc::clone(&store), OwnerId::new("U1"));
        let (progressed, created) = tokio::join!(
            screen.wait_for_update(),
            writer.create(Collection::Clients, DocumentWrite::new().set("nombre", "Acme"))
        );
        let id = created.unwrap();
        assert!(progressed);
        assert_eq!(screen.clients().first().unwrap().id.as_str(), id.as_str());
    }

    #[tokio::test]
    async fn test_close_detaches() {
        let (store, mut screen, _notices) = screen();
        screen.close();
        assert_eq!(store.listener_count(), 0);
        assert!(!screen.is_open());
        assert!(!screen.is_loaded());
    }
}
