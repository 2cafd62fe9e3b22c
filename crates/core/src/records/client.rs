//! Client record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Record, empty_as_none};
use crate::{ClientId, OwnerId};

/// A customer of the support business.
///
/// Created from the clients form, edited in place (name and phone only) and
/// deleted explicitly. Deleting a client leaves its tickets and quotes alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(rename = "ownerId")]
    pub owner_id: OwnerId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(
        rename = "telefono",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(rename = "creado", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Client {
    type Id = ClientId;

    const COLLECTION: Collection = Collection::Clients;

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_blank_phone_as_none() {
        let client: Client = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "ownerId": "U1",
            "nombre": "Acme",
            "telefono": "",
            "creado": "2025-03-01T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(client.name, "Acme");
        assert_eq!(client.phone, None);
        assert!(client.created_at.is_some());
    }

    #[test]
    fn test_decode_without_timestamp() {
        let client: Client = serde_json::from_value(serde_json::json!({
            "id": "c2",
            "ownerId": "U1",
            "nombre": "Taller Díaz",
            "telefono": "555-1111",
        }))
        .unwrap();

        assert_eq!(client.phone.as_deref(), Some("555-1111"));
        assert_eq!(client.created_at, None);
    }
}
