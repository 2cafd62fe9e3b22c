//! Ticket (incidencia) record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Record, empty_as_none};
use crate::{ClientId, OwnerId, TicketId, TicketPriority, TicketStatus};

/// A support ticket raised for one client.
///
/// `client_name` is a copy of the client's name taken when the ticket was
/// created. It is not updated when the client is renamed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(rename = "ownerId")]
    pub owner_id: OwnerId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(
        rename = "descripcion",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: TicketStatus,
    #[serde(rename = "prioridad", default)]
    pub priority: TicketPriority,
    #[serde(rename = "clienteId")]
    pub client_id: ClientId,
    #[serde(rename = "clienteNombre", default)]
    pub client_name: String,
    #[serde(rename = "creado", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Ticket {
    type Id = TicketId;

    const COLLECTION: Collection = Collection::Tickets;

    fn id(&self) -> &TicketId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}
