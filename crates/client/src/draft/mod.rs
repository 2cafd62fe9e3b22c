//! Per-screen drafts.
//!
//! A draft is the local, editable copy of one record's form fields. Each
//! screen has exactly one, in one of two modes:
//!
//! - [`DraftMode::Create`] - no record bound; saving inserts
//! - [`DraftMode::Edit`] - bound to one record; saving updates it
//!
//! Beginning an edit copies the record's current values into the draft.
//! Cancelling or saving successfully returns to a cleared create draft. A
//! failed save leaves the draft as it was so the user can retry.
//!
//! Validation runs synchronously and stops at the first failing rule, before
//! anything is sent to the store.

mod client;
mod quote;
mod ticket;

use thiserror::Error;

use teckadm_core::EmailError;

pub use client::{ClientDraft, ClientFields};
pub use quote::{QuoteDraft, QuoteFields};
pub use ticket::{TicketDraft, TicketFields};

/// Whether a draft creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftMode<Id> {
    #[default]
    Create,
    Edit(Id),
}

impl<Id> DraftMode<Id> {
    /// Whether the draft is bound to an existing record.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// Id of the record being edited.
    #[must_use]
    pub const fn editing_id(&self) -> Option<&Id> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(id),
        }
    }
}

/// A client-side validation failure. The message is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Client name is blank.
    #[error("Falta el nombre")]
    MissingClientName,

    /// Ticket title is blank.
    #[error("Falta el título")]
    MissingTicketTitle,

    /// No client is selected, or the selected client no longer exists.
    #[error("Selecciona un cliente")]
    NoClientSelected,

    /// Every line item has a blank description.
    #[error("Agrega al menos un ítem con descripción.")]
    NoLineItems,

    /// Sign-up password is too short.
    #[error("La contraseña debe tener al menos {min} caracteres")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },

    /// Sign-up password and confirmation differ.
    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,

    /// Email is malformed.
    #[error("Email inválido: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Trim a form field, returning `None` when nothing is left.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use teckadm_core::ClientId;

    use super::*;

    #[test]
    fn test_mode_accessors() {
        let create: DraftMode<ClientId> = DraftMode::default();
        assert!(!create.is_editing());
        assert_eq!(create.editing_id(), None);

        let edit = DraftMode::Edit(ClientId::new("c1"));
        assert!(edit.is_editing());
        assert_eq!(edit.editing_id().map(ClientId::as_str), Some("c1"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  Acme "), Some("Acme".to_owned()));
        assert_eq!(non_blank(" \t "), None);
    }
}
