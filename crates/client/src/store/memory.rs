//! In-process document store.
//!
//! Behaves like the hosted store as far as the client can observe it:
//! insertion-ordered collections, equality-filtered live queries that push
//! the full result set after every write, and server timestamps. Used by
//! the tests and, persisted to a JSON file, by the command-line front end.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use teckadm_core::{Collection, DocumentId};

use super::{
    DocumentStore, DocumentWrite, Fields, Listener, Query, SnapshotResult, StoreError,
    StoredDocument,
};

/// Serializable contents of a [`MemoryStore`], keyed by collection name.
pub type StoreSnapshot = BTreeMap<String, Vec<StoredDocument>>;

struct ListenerEntry {
    id: u64,
    query: Query,
    sender: mpsc::UnboundedSender<SnapshotResult>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<Collection, Vec<StoredDocument>>,
    listeners: Vec<ListenerEntry>,
    next_listener: u64,
    last_stamp: Option<DateTime<Utc>>,
    write_failures: VecDeque<StoreError>,
    listen_failure: Option<StoreError>,
}

impl Inner {
    /// Server clock, strictly increasing so `creado desc` never ties.
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now().trunc_subsecs(6);
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn apply(&mut self, fields: &mut Fields, server_timestamp: Option<&'static str>) {
        if let Some(field) = server_timestamp {
            let stamp = self.next_stamp();
            fields.insert(
                field.to_owned(),
                Value::String(stamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
    }

    fn docs(&self, collection: Collection) -> &[StoredDocument] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Push the current result set to every listener on `collection`,
    /// dropping listeners whose receiving end is gone.
    fn notify(&mut self, collection: Collection) {
        let docs = self.collections.remove(&collection).unwrap_or_default();
        self.listeners.retain(|entry| {
            if entry.query.collection() != collection {
                return true;
            }
            entry.sender.send(Ok(entry.query.evaluate(&docs))).is_ok()
        });
        self.collections.insert(collection, docs);
    }
}

/// An in-process [`DocumentStore`].
///
/// Cloning yields another handle to the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. Unknown collection names are
    /// skipped.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut inner = Inner::default();
        for (name, docs) in snapshot {
            match Collection::ALL.into_iter().find(|c| c.name() == name) {
                Some(collection) => {
                    inner.collections.insert(collection, docs);
                }
                None => warn!(collection = %name, "Skipping unknown collection in snapshot"),
            }
        }
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Copy the store's contents out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let inner = self.lock()?;
        Ok(Collection::ALL
            .into_iter()
            .map(|c| (c.name().to_owned(), inner.docs(c).to_vec()))
            .collect())
    }

    /// Make the next write fail with `error`. Failures queue up in order.
    pub fn fail_next_write(&self, error: StoreError) {
        if let Ok(mut inner) = self.lock() {
            inner.write_failures.push_back(error);
        }
    }

    /// Make every new listener receive `error` as its first delivery and
    /// then stop. `None` restores normal behavior.
    pub fn fail_listens(&self, error: Option<StoreError>) {
        if let Ok(mut inner) = self.lock() {
            inner.listen_failure = error;
        }
    }

    /// Number of live listeners, across all collections.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().map_or(0, |inner| {
            inner
                .listeners
                .iter()
                .filter(|entry| !entry.sender.is_closed())
                .count()
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_owned()))
    }

    fn take_write_failure(inner: &mut Inner) -> Result<(), StoreError> {
        inner.write_failures.pop_front().map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl DocumentStore for MemoryStore {
    fn listen(&self, query: Query) -> Result<Listener, StoreError> {
        let mut inner = self.lock()?;
        let (sender, receiver) = mpsc::unbounded_channel();

        if let Some(error) = inner.listen_failure.clone() {
            debug!(collection = %query.collection(), error = %error, "Failing listener");
            // The sender is dropped right away: one error delivery, then closed.
            let _ = sender.send(Err(error));
            return Ok(Listener::new(receiver, || {}));
        }

        let id = inner.next_listener;
        inner.next_listener += 1;
        let _ = sender.send(Ok(query.evaluate(inner.docs(query.collection()))));
        debug!(listener = id, collection = %query.collection(), "Listener registered");
        inner.listeners.push(ListenerEntry { id, query, sender });

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        Ok(Listener::new(receiver, move || {
            if let Some(shared) = weak.upgrade()
                && let Ok(mut inner) = shared.lock()
            {
                inner.listeners.retain(|entry| entry.id != id);
                debug!(listener = id, "Listener closed");
            }
        }))
    }

    async fn insert(
        &self,
        collection: Collection,
        write: DocumentWrite,
    ) -> Result<DocumentId, StoreError> {
        let mut inner = self.lock()?;
        Self::take_write_failure(&mut inner)?;

        let (mut fields, stamp) = write.into_parts();
        inner.apply(&mut fields, stamp);

        let id = DocumentId::new(Uuid::new_v4().simple().to_string());
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                fields,
            });
        inner.notify(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        write: DocumentWrite,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        Self::take_write_failure(&mut inner)?;

        let (mut fields, stamp) = write.into_parts();
        inner.apply(&mut fields, stamp);

        let doc = inner
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.clone(),
            })?;
        doc.fields.extend(fields);
        inner.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        Self::take_write_failure(&mut inner)?;

        if let Some(docs) = inner.collections.get_mut(&collection) {
            docs.retain(|doc| doc.id != id);
        }
        inner.notify(collection);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::sync::mpsc::error::TryRecvError;

    use teckadm_core::{OwnerId, fields};

    use super::*;
    use crate::store::OrderBy;

    fn client_write(owner: &str, name: &str) -> DocumentWrite {
        DocumentWrite::new()
            .set(fields::OWNER, owner)
            .set("nombre", name)
            .with_server_timestamp(fields::CREATED)
    }

    #[tokio::test]
    async fn test_listen_delivers_initial_and_after_write() {
        let store = MemoryStore::new();
        let mut listener = store
            .listen(Query::owned_by(Collection::Clients, &OwnerId::new("U1")))
            .unwrap();

        assert_eq!(listener.try_recv().unwrap().unwrap().len(), 0);

        store
            .insert(Collection::Clients, client_write("U1", "Acme"))
            .await
            .unwrap();

        let snapshot = listener.try_recv().unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].fields.contains_key(fields::CREATED));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Clients, client_write("U1", "Acme"))
            .await
            .unwrap();

        store
            .update(
                Collection::Clients,
                id.clone(),
                DocumentWrite::new().set("telefono", "555"),
            )
            .await
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        let doc = &snapshot["clientes"][0];
        assert_eq!(doc.fields["nombre"], "Acme");
        assert_eq!(doc.fields["telefono"], "555");
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let err = store
            .update(Collection::Tickets, "nope".into(), DocumentWrite::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[tokio::test]
    async fn test_stamps_strictly_increase() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store
                .insert(Collection::Clients, client_write("U1", name))
                .await
                .unwrap();
        }
        let mut listener = store
            .listen(
                Query::owned_by(Collection::Clients, &OwnerId::new("U1"))
                    .order_by(OrderBy::NEWEST_FIRST),
            )
            .unwrap();

        let names: Vec<_> = listener
            .try_recv()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|d| d.fields["nombre"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_dropping_listener_unregisters() {
        let store = MemoryStore::new();
        let listener = store
            .listen(Query::owned_by(Collection::Quotes, &OwnerId::new("U1")))
            .unwrap();
        assert_eq!(store.listener_count(), 1);

        drop(listener);
        assert_eq!(store.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.fail_next_write(StoreError::PermissionDenied("rules".into()));

        let err = store
            .insert(Collection::Clients, client_write("U1", "Acme"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "permission-denied");

        // Only the next write fails.
        store
            .insert(Collection::Clients, client_write("U1", "Acme"))
            .await
            .unwrap();

        store.fail_listens(Some(StoreError::Unavailable("offline".into())));
        let mut listener = store
            .listen(Query::owned_by(Collection::Clients, &OwnerId::new("U1")))
            .unwrap();
        assert!(listener.try_recv().unwrap().is_err());
        assert_eq!(listener.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_keeps_order() {
        let store = MemoryStore::new();
        for name in ["uno", "dos"] {
            store
                .insert(Collection::Clients, client_write("U1", name))
                .await
                .unwrap();
        }

        let restored = MemoryStore::from_snapshot(store.snapshot().unwrap());
        let mut listener = restored
            .listen(Query::owned_by(Collection::Clients, &OwnerId::new("U1")))
            .unwrap();
        let names: Vec<_> = listener
            .try_recv()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|d| d.fields["nombre"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["uno", "dos"]);
    }
}
