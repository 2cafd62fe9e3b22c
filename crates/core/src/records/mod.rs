//! Records mirrored from the document store.
//!
//! Each record kind lives in its own flat collection. Every document carries
//! an owner field holding the identity of the account that created it; that
//! field is the only query filter ever used.
//!
//! Field names on the wire are the Spanish names the collections were
//! created with (`nombre`, `titulo`, `creado`, ...). The Rust side uses
//! English names with `#[serde(rename)]`.

mod client;
mod quote;
mod ticket;

use core::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::OwnerId;

pub use client::Client;
pub use quote::{LineItem, Quote, items_total};
pub use ticket::Ticket;

/// Persisted field names shared by several collections.
pub mod fields {
    /// Document id, injected when a snapshot is decoded.
    pub const ID: &str = "id";
    /// Owner identity; the sole query filter.
    pub const OWNER: &str = "ownerId";
    /// Server-assigned timestamp.
    pub const CREATED: &str = "creado";
    /// Client reference on tickets and quotes.
    pub const CLIENT_ID: &str = "clienteId";
}

/// The three collections the application reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `clientes`
    Clients,
    /// `incidencias`
    Tickets,
    /// `cotizaciones`
    Quotes,
}

impl Collection {
    /// Every collection, in the order the tabs show them.
    pub const ALL: [Self; 3] = [Self::Clients, Self::Tickets, Self::Quotes];

    /// Collection name in the document store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clients => "clientes",
            Self::Tickets => "incidencias",
            Self::Quotes => "cotizaciones",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record kind stored in one collection and scoped to one owner.
pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Typed id of the record.
    type Id: Clone + Eq + fmt::Debug + fmt::Display + Send + Sync;

    /// Collection holding this record kind.
    const COLLECTION: Collection;

    /// Identity of the record.
    fn id(&self) -> &Self::Id;

    /// Account that owns the record.
    fn owner(&self) -> &OwnerId;
}

/// Optional text fields are written as `""` when absent; read them back as
/// `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
