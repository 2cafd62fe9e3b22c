//! The three record screens.
//!
//! Each screen owns its live queries, its list views and exactly one draft.
//! Screens are opened for one owner and closed when that owner signs out;
//! nothing is shared between screens.
//!
//! Deliveries are applied when the screen is polled with `sync` (everything
//! queued so far) or `wait_for_update` (the next delivery on the screen's
//! main list).

mod clients;
mod quotes;
mod tickets;

use tracing::{debug, warn};

use teckadm_core::{OwnerId, Record};

use crate::error::{AppError, Operation};
use crate::live::LiveQuery;
use crate::notice::Notices;
use crate::reconcile::ListView;
use crate::store::{DocumentStore, OrderBy};

pub use clients::ClientsScreen;
pub use quotes::{DeletePrompt, QuotesScreen};
pub use tickets::TicketsScreen;

/// A live query feeding a list view.
#[derive(Debug)]
pub(crate) struct Feed<R> {
    live: Option<LiveQuery<R>>,
    view: ListView<R>,
    notices: Notices,
}

impl<R: Record> Feed<R> {
    /// Subscribe. A refused subscription is reported and leaves the feed
    /// empty; there is no retry.
    pub(crate) fn open<S: DocumentStore>(
        store: &S,
        owner: &OwnerId,
        order: Option<OrderBy>,
        notices: Notices,
    ) -> Self {
        let live = match LiveQuery::open(store, owner, order) {
            Ok(live) => Some(live),
            Err(err) => {
                warn!(error = %err, "Subscription refused");
                notices.push(err.notice(Operation::Load));
                None
            }
        };
        Self {
            live,
            view: ListView::new(),
            notices,
        }
    }

    pub(crate) const fn view(&self) -> &ListView<R> {
        &self.view
    }

    /// Look up a listed record.
    pub(crate) fn find(&self, id: &R::Id) -> Result<&R, AppError> {
        self.view
            .get(id)
            .ok_or_else(|| AppError::UnknownRecord(id.to_string()))
    }

    pub(crate) fn is_open(&self) -> bool {
        self.live.as_ref().is_some_and(LiveQuery::is_open)
    }

    /// Apply every queued delivery. Returns how many were applied.
    pub(crate) fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Some(delivery) = self.live.as_mut().and_then(LiveQuery::try_next) {
            self.apply(delivery);
            applied += 1;
        }
        applied
    }

    /// Wait for the next delivery and apply it. Returns `false` once the
    /// subscription has ended.
    pub(crate) async fn wait(&mut self) -> bool {
        let Some(live) = self.live.as_mut() else {
            return false;
        };
        match live.next().await {
            Some(delivery) => {
                self.apply(delivery);
                true
            }
            None => false,
        }
    }

    /// Unsubscribe and forget the list.
    pub(crate) fn close(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.close();
        }
        self.live = None;
        self.view.clear();
    }

    fn apply(&mut self, delivery: Result<Vec<R>, AppError>) {
        match delivery {
            Ok(records) => self.view.replace(records),
            Err(err) => {
                warn!(error = %err, "Subscription failed");
                self.notices.push(err.notice(Operation::Load));
            }
        }
    }
}

/// Show a failed action to the user and hand the error back.
pub(crate) fn reported<T>(
    notices: &Notices,
    operation: Operation,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    result.inspect_err(|err| {
        if matches!(err, AppError::Validation(_)) {
            debug!(error = %err, ?operation, "Rejected by validation");
        } else {
            warn!(error = %err, ?operation, "Action failed");
        }
        notices.push(err.notice(operation));
    })
}
