//! Snapshot reconciler.
//!
//! Live queries deliver the whole result set each time, so reconciling is
//! plain replacement: the view state becomes the delivered records, in the
//! order delivered. No diffing and no local sorting; when a screen wants
//! newest-first it asks the store for it.

use teckadm_core::{Client, ClientId, Record};

/// The records a screen currently shows.
#[derive(Debug, Clone)]
pub struct ListView<R> {
    records: Vec<R>,
    deliveries: u64,
}

impl<R: Record> ListView<R> {
    /// An empty view that has not received a delivery yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            deliveries: 0,
        }
    }

    /// Replace the view with a delivered snapshot.
    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
        self.deliveries += 1;
    }

    /// Forget everything, back to not loaded.
    pub fn clear(&mut self) {
        self.records.clear();
        self.deliveries = 0;
    }

    /// Whether at least one snapshot has arrived.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.deliveries > 0
    }

    /// Number of snapshots applied.
    #[must_use]
    pub const fn deliveries(&self) -> u64 {
        self.deliveries
    }

    /// Records in delivery order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&R> {
        self.records.first()
    }

    /// Look a record up by identity.
    #[must_use]
    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }
}

impl<R: Record> Default for ListView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R: Record> IntoIterator for &'a ListView<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Client selector of the ticket and quote forms.
///
/// An explicit choice always wins. Without one, the selection is the first
/// client of the current list, re-evaluated on every delivery; with an
/// empty list there is no selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPicker {
    explicit: Option<ClientId>,
    default: Option<ClientId>,
}

impl ClientPicker {
    /// Placeholder shown when nothing is selected.
    pub const PROMPT: &'static str = "Selecciona un cliente";
    /// Shown when the selected client is not in the list.
    pub const MISSING: &'static str = "—";

    /// A picker with no selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            explicit: None,
            default: None,
        }
    }

    /// Record the user's choice.
    pub fn choose(&mut self, id: ClientId) {
        self.explicit = Some(id);
    }

    /// Drop the user's choice; the default applies again.
    pub fn clear_choice(&mut self, clients: &ListView<Client>) {
        self.explicit = None;
        self.reconcile(clients);
    }

    /// Recompute the default after the client list changed.
    pub fn reconcile(&mut self, clients: &ListView<Client>) {
        self.default = clients.first().map(|client| client.id.clone());
    }

    /// Whether the user picked a client explicitly.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }

    /// Selected client id, explicit or default.
    #[must_use]
    pub fn selected(&self) -> Option<&ClientId> {
        self.explicit.as_ref().or(self.default.as_ref())
    }

    /// The selected client, if it is in `clients`.
    #[must_use]
    pub fn selected_client<'a>(&self, clients: &'a ListView<Client>) -> Option<&'a Client> {
        self.selected().and_then(|id| clients.get(id))
    }

    /// Text for the picker button.
    #[must_use]
    pub fn label(&self, clients: &ListView<Client>) -> String {
        match (self.selected(), self.selected_client(clients)) {
            (None, _) => Self::PROMPT.to_owned(),
            (Some(_), Some(client)) => client.name.clone(),
            (Some(_), None) => Self::MISSING.to_owned(),
        }
    }
}
