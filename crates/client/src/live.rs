//! Owner-scoped live query subscriptions.
//!
//! A [`LiveQuery`] follows one collection, filtered to the signed-in owner
//! and optionally ordered by the store. Every delivery is the full current
//! result set, decoded into records. Closing (or dropping) the subscription
//! stops deliveries; nothing arrives after that.

use std::marker::PhantomData;

use serde_json::Value;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use teckadm_core::{OwnerId, Record, fields};

use crate::error::AppError;
use crate::store::{DocumentStore, Listener, OrderBy, Query, StoreError, StoredDocument};

/// A live subscription to the owner's records of type `R`.
#[derive(Debug)]
pub struct LiveQuery<R> {
    owner: OwnerId,
    listener: Option<Listener>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> LiveQuery<R> {
    /// Subscribe to `R`'s collection for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Subscription`] if the store refuses the query.
    pub fn open<S: DocumentStore>(
        store: &S,
        owner: &OwnerId,
        order: Option<OrderBy>,
    ) -> Result<Self, AppError> {
        let query = Query::owned_by(R::COLLECTION, owner).maybe_order_by(order);
        let listener = store.listen(query).map_err(|source| AppError::Subscription {
            collection: R::COLLECTION,
            source,
        })?;
        debug!(collection = %R::COLLECTION, owner = %owner, "Subscribed");
        Ok(Self {
            owner: owner.clone(),
            listener: Some(listener),
            _record: PhantomData,
        })
    }

    /// Owner this subscription is scoped to.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Whether deliveries can still arrive.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.listener.is_some()
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the subscription is closed or the store stopped
    /// delivering.
    pub async fn next(&mut self) -> Option<Result<Vec<R>, AppError>> {
        let delivery = self.listener.as_mut()?.recv().await;
        self.accept(delivery)
    }

    /// Take the next snapshot if one is already queued. A store that hung
    /// up closes the subscription.
    pub fn try_next(&mut self) -> Option<Result<Vec<R>, AppError>> {
        match self.listener.as_mut()?.try_recv() {
            Ok(delivery) => self.accept(Some(delivery)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.accept(None),
        }
    }

    /// Stop deliveries.
    pub fn close(&mut self) {
        if self.listener.take().is_some() {
            debug!(collection = %R::COLLECTION, owner = %self.owner, "Unsubscribed");
        }
    }

    fn accept(
        &mut self,
        delivery: Option<Result<Vec<StoredDocument>, StoreError>>,
    ) -> Option<Result<Vec<R>, AppError>> {
        match delivery {
            Some(Ok(docs)) => Some(Ok(decode(&self.owner, docs))),
            Some(Err(source)) => Some(Err(AppError::Subscription {
                collection: R::COLLECTION,
                source,
            })),
            None => {
                self.close();
                None
            }
        }
    }
}

/// Decode a delivered result set.
///
/// Documents that do not decode are skipped rather than failing the whole
/// snapshot. Records owned by someone else never reach a screen.
fn decode<R: Record>(owner: &OwnerId, docs: Vec<StoredDocument>) -> Vec<R> {
    docs.into_iter()
        .filter_map(|doc| {
            let StoredDocument { id, mut fields } = doc;
            fields.insert(fields::ID.to_owned(), Value::String(id.as_str().to_owned()));
            match serde_json::from_value::<R>(Value::Object(fields)) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        collection = %R::COLLECTION,
                        id = %id,
                        error = %err,
                        "Skipping undecodable document"
                    );
                    None
                }
            }
        })
        .filter(|record| record.owner() == owner)
        .collect()
}
