//! Mutation dispatcher.
//!
//! Turns validated drafts into single-document writes against the store.
//! Creates are stamped with the owner and the server timestamp; updates
//! never touch ownership. Writes are fire-and-report: the updated list
//! arrives through the screen's live query, not from the write's result.

use std::sync::Arc;

use tracing::{info, instrument};

use teckadm_core::{Collection, DocumentId, OwnerId, fields};

use crate::store::{DocumentStore, DocumentWrite, StoreError};

/// Issues writes on behalf of one owner.
#[derive(Debug)]
pub struct MutationDispatcher<S> {
    store: Arc<S>,
    owner: OwnerId,
}

impl<S> Clone for MutationDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            owner: self.owner.clone(),
        }
    }
}

impl<S: DocumentStore> MutationDispatcher<S> {
    #[must_use]
    pub const fn new(store: Arc<S>, owner: OwnerId) -> Self {
        Self { store, owner }
    }

    /// Owner stamped on created records.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Insert a new record owned by the current owner.
    ///
    /// # Errors
    ///
    /// Returns the store's error; nothing is written in that case.
    #[instrument(skip(self, write), fields(owner = %self.owner))]
    pub async fn create(
        &self,
        collection: Collection,
        write: DocumentWrite,
    ) -> Result<DocumentId, StoreError> {
        let mut write = write.set(fields::OWNER, self.owner.as_str());
        if write.server_timestamp().is_none() {
            write = write.with_server_timestamp(fields::CREATED);
        }
        let id = self.store.insert(collection, write).await?;
        info!(id = %id, "Record created");
        Ok(id)
    }

    /// Overwrite the fields in `write` on an existing record.
    ///
    /// Ownership and identity fields are stripped if present.
    ///
    /// # Errors
    ///
    /// Returns the store's error, including `not-found` for a missing
    /// record.
    #[instrument(skip(self, write), fields(owner = %self.owner, touched = ?write.field_names()))]
    pub async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        mut write: DocumentWrite,
    ) -> Result<(), StoreError> {
        write.remove(fields::OWNER);
        write.remove(fields::ID);
        self.store.update(collection, id.clone(), write).await?;
        info!(id = %id, "Record updated");
        Ok(())
    }

    /// Delete a record. Deleting a record that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn delete(&self, collection: Collection, id: DocumentId) -> Result<(), StoreError> {
        self.store.delete(collection, id.clone()).await?;
        info!(id = %id, "Record deleted");
        Ok(())
    }
}
