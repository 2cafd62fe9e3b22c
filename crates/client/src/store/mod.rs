//! Document store collaborator.
//!
//! The hosted store is schema-on-read: documents are JSON objects in flat
//! named collections. This module defines the small slice of it the client
//! uses:
//!
//! - [`DocumentStore::listen`] - an equality-filtered, optionally ordered
//!   live query that pushes the full result set on every change
//! - [`DocumentStore::insert`] / [`update`](DocumentStore::update) /
//!   [`delete`](DocumentStore::delete) - single-document writes
//!
//! No transactions, batched writes or pagination.

mod memory;
mod query;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use teckadm_core::{Collection, DocumentId};

pub use memory::{MemoryStore, StoreSnapshot};
pub use query::{Direction, OrderBy, Query};

/// A document's fields.
pub type Fields = Map<String, Value>;

/// A document as delivered by a live query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Store-assigned id.
    pub id: DocumentId,
    /// Document body.
    pub fields: Fields,
}

/// One delivery from a live query: the entire matching result set.
pub type SnapshotResult = Result<Vec<StoredDocument>, StoreError>;

/// Errors reported by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Security rules rejected the request.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The target document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection searched.
        collection: Collection,
        /// Missing document.
        id: DocumentId,
    },

    /// Transport or backend failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The request itself was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    /// Short error code, shown alongside the message in notices.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permission-denied",
            Self::NotFound { .. } => "not-found",
            Self::Unavailable(_) => "unavailable",
            Self::InvalidArgument(_) => "invalid-argument",
        }
    }
}

/// Field values for an insert or update.
///
/// `server_timestamp` names a field the store fills with its own clock at
/// write time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentWrite {
    fields: Fields,
    server_timestamp: Option<&'static str>,
}

impl DocumentWrite {
    /// An empty write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_owned(), value.into());
        self
    }

    /// Ask the store to stamp `field` with the server time.
    #[must_use]
    pub fn with_server_timestamp(mut self, field: &'static str) -> Self {
        self.server_timestamp = Some(field);
        self
    }

    /// Drop a field if present.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Fields to write, excluding the server timestamp.
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Field the server should stamp, if any.
    #[must_use]
    pub const fn server_timestamp(&self) -> Option<&'static str> {
        self.server_timestamp
    }

    /// Names of every field this write touches.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        if let Some(stamp) = self.server_timestamp {
            names.push(stamp);
        }
        names
    }

    pub(crate) fn into_parts(self) -> (Fields, Option<&'static str>) {
        (self.fields, self.server_timestamp)
    }
}

/// Receiving end of a live query.
///
/// Dropping the listener unregisters it from the store.
pub struct Listener {
    receiver: mpsc::UnboundedReceiver<SnapshotResult>,
    on_close: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Listener {
    /// Wrap a delivery channel. `on_close` runs once when the listener is
    /// dropped.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<SnapshotResult>,
        on_close: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            receiver,
            on_close: Some(Box::new(on_close)),
        }
    }

    /// Wait for the next delivery. `None` once the store stops delivering.
    pub async fn recv(&mut self) -> Option<SnapshotResult> {
        self.receiver.recv().await
    }

    /// Take the next delivery if one is already queued.
    ///
    /// # Errors
    ///
    /// [`TryRecvError::Empty`] when nothing is queued yet,
    /// [`TryRecvError::Disconnected`] once the store stopped delivering.
    pub fn try_recv(&mut self) -> Result<SnapshotResult, TryRecvError> {
        self.receiver.try_recv()
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
    }
}

/// The document store collaborator.
pub trait DocumentStore: Send + Sync + 'static {
    /// Open a live query. The current result set is delivered first, then
    /// again after every change that affects the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be registered at all. Failures
    /// after registration arrive as an `Err` delivery.
    fn listen(&self, query: Query) -> Result<Listener, StoreError>;

    /// Insert one document and return its new id.
    fn insert(
        &self,
        collection: Collection,
        write: DocumentWrite,
    ) -> impl Future<Output = Result<DocumentId, StoreError>> + Send;

    /// Overwrite the named fields of one document, leaving the rest intact.
    fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        write: DocumentWrite,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete one document. Deleting a missing document is not an error.
    fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
