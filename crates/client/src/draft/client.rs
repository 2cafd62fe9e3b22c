//! Client form.

use teckadm_core::{Client, ClientId};

use super::{DraftMode, ValidationError, non_blank};
use crate::store::DocumentWrite;

/// Validated client fields, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFields {
    pub name: String,
    pub phone: Option<String>,
}

impl ClientFields {
    /// Fields written by both create and update. The owner and timestamp
    /// are added by the dispatcher on create only.
    #[must_use]
    pub fn to_write(&self) -> DocumentWrite {
        DocumentWrite::new()
            .set("nombre", self.name.as_str())
            .set("telefono", self.phone.as_deref().unwrap_or_default())
    }
}

/// Draft of the clients form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    pub mode: DraftMode<ClientId>,
    pub name: String,
    pub phone: String,
}

impl ClientDraft {
    /// An empty create draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the draft to `client` and copy its values in.
    pub fn begin_edit(&mut self, client: &Client) {
        self.mode = DraftMode::Edit(client.id.clone());
        self.name.clone_from(&client.name);
        self.phone = client.phone.clone().unwrap_or_default();
    }

    /// Back to an empty create draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingClientName`] when the name is blank.
    pub fn validate(&self) -> Result<ClientFields, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::MissingClientName)?;
        Ok(ClientFields {
            name,
            phone: non_blank(&self.phone),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use teckadm_core::OwnerId;

    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let draft = ClientDraft {
            name: "   ".into(),
            phone: "555".into(),
            ..ClientDraft::new()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingClientName));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let draft = ClientDraft {
            name: " Acme ".into(),
            phone: "  ".into(),
            ..ClientDraft::new()
        };
        let fields = draft.validate().unwrap();
        assert_eq!(fields.name, "Acme");
        assert_eq!(fields.phone, None);

        let write = fields.to_write();
        assert_eq!(write.fields()["telefono"], "");
    }

    #[test]
    fn test_begin_edit_then_reset() {
        let client = Client {
            id: ClientId::new("c1"),
            owner_id: OwnerId::new("U1"),
            name: "Acme".into(),
            phone: Some("555-1111".into()),
            created_at: None,
        };
        let mut draft = ClientDraft::new();
        draft.begin_edit(&client);
        assert_eq!(draft.mode, DraftMode::Edit(ClientId::new("c1")));
        assert_eq!(draft.phone, "555-1111");

        draft.reset();
        assert_eq!(draft, ClientDraft::new());
    }
}
