//! Ticket form.

use teckadm_core::{Client, ClientId, Ticket, TicketId, TicketPriority, TicketStatus};

use super::{DraftMode, ValidationError, non_blank};
use crate::reconcile::{ClientPicker, ListView};
use crate::store::DocumentWrite;

/// Validated ticket fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Client of a new ticket. Edits never move a ticket to another client.
    pub client: Option<(ClientId, String)>,
}

impl TicketFields {
    /// Fields of a new ticket, including the denormalized client name.
    #[must_use]
    pub fn create_write(&self) -> DocumentWrite {
        let write = self.update_write();
        match &self.client {
            Some((id, name)) => write
                .set("clienteId", id.as_str())
                .set("clienteNombre", name.as_str()),
            None => write,
        }
    }

    /// Fields an edit overwrites. Client and creation time stay as stored.
    #[must_use]
    pub fn update_write(&self) -> DocumentWrite {
        DocumentWrite::new()
            .set("titulo", self.title.as_str())
            .set("descripcion", self.description.as_deref().unwrap_or_default())
            .set("estado", self.status.as_str())
            .set("prioridad", self.priority.as_str())
    }
}

/// Draft of the tickets form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub mode: DraftMode<TicketId>,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub picker: ClientPicker,
}

impl TicketDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the draft to `ticket`.
    pub fn begin_edit(&mut self, ticket: &Ticket) {
        self.mode = DraftMode::Edit(ticket.id.clone());
        self.title.clone_from(&ticket.title);
        self.description = ticket.description.clone().unwrap_or_default();
        self.status = ticket.status;
        self.priority = ticket.priority;
    }

    /// Back to an empty create draft. The client selection is kept.
    pub fn reset(&mut self) {
        let picker = std::mem::take(&mut self.picker);
        *self = Self {
            picker,
            ..Self::default()
        };
    }

    /// Check the form against the current client list.
    ///
    /// # Errors
    ///
    /// Fails on a blank title, or when creating without a selected client
    /// that exists in `clients`.
    pub fn validate(&self, clients: &ListView<Client>) -> Result<TicketFields, ValidationError> {
        let title = non_blank(&self.title).ok_or(ValidationError::MissingTicketTitle)?;

        let client = if self.mode.is_editing() {
            None
        } else {
            let client = self
                .picker
                .selected_client(clients)
                .ok_or(ValidationError::NoClientSelected)?;
            Some((client.id.clone(), client.name.clone()))
        };

        Ok(TicketFields {
            title,
            description: non_blank(&self.description),
            status: self.status,
            priority: self.priority,
            client,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use teckadm_core::OwnerId;

    use super::*;

    fn clients() -> ListView<Client> {
        let mut view = ListView::new();
        view.replace(vec![Client {
            id: ClientId::new("c1"),
            owner_id: OwnerId::new("U1"),
            name: "Acme".into(),
            phone: None,
            created_at: None,
        }]);
        view
    }

    #[test]
    fn test_create_requires_title_then_client() {
        let empty = ListView::new();
        let mut draft = TicketDraft::new();
        assert_eq!(
            draft.validate(&empty),
            Err(ValidationError::MissingTicketTitle)
        );

        draft.title = "No enciende".into();
        assert_eq!(
            draft.validate(&empty),
            Err(ValidationError::NoClientSelected)
        );
    }

    #[test]
    fn test_create_write_carries_client_name() {
        let clients = clients();
        let mut draft = TicketDraft::new();
        draft.picker.reconcile(&clients);
        draft.title = "  No enciende ".into();
        draft.priority = TicketPriority::High;

        let write = draft.validate(&clients).unwrap().create_write();
        let fields = write.fields();
        assert_eq!(fields["titulo"], "No enciende");
        assert_eq!(fields["descripcion"], "");
        assert_eq!(fields["estado"], "abierta");
        assert_eq!(fields["prioridad"], "alta");
        assert_eq!(fields["clienteId"], "c1");
        assert_eq!(fields["clienteNombre"], "Acme");
    }

    #[test]
    fn test_edit_skips_client_and_keeps_picker_on_reset() {
        let clients = clients();
        let ticket = Ticket {
            id: TicketId::new("t1"),
            owner_id: OwnerId::new("U1"),
            title: "No enciende".into(),
            description: Some("Pantalla negra".into()),
            status: TicketStatus::InProgress,
            priority: TicketPriority::Medium,
            client_id: ClientId::new("gone"),
            client_name: "Old".into(),
            created_at: None,
        };

        let mut draft = TicketDraft::new();
        draft.picker.choose(ClientId::new("c1"));
        draft.begin_edit(&ticket);
        let fields = draft.validate(&ListView::new()).unwrap();
        assert_eq!(fields.client, None);
        assert_eq!(
            fields.update_write().field_names().len(),
            4,
            "edit writes only titulo/descripcion/estado/prioridad"
        );

        draft.reset();
        assert_eq!(draft.mode, DraftMode::Create);
        assert!(draft.title.is_empty());
        assert_eq!(draft.picker.label(&clients), "Acme");
    }
}
