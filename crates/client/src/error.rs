//! Unified error handling.
//!
//! Provides a unified `AppError` type. Nothing here is fatal: screens turn
//! every error into a [`Notice`] with [`AppError::notice`] and carry on.

use thiserror::Error;

use teckadm_core::Collection;

use crate::auth::AuthError;
use crate::draft::ValidationError;
use crate::notice::Notice;
use crate::store::StoreError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// The form failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The authentication service rejected the request.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A live query failed.
    #[error("Subscription to {collection} failed: {source}")]
    Subscription {
        collection: Collection,
        #[source]
        source: StoreError,
    },

    /// A write was rejected by the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The referenced record is not in the current list.
    #[error("Unknown record: {0}")]
    UnknownRecord(String),

    /// The local state file could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// What the user was doing when an error happened. Picks the notice title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
    SignIn,
    SignUp,
}

impl Operation {
    /// Title of the failure notice.
    #[must_use]
    pub const fn failure_title(self) -> &'static str {
        match self {
            Self::Load => "Error",
            Self::Create => "Error al agregar",
            Self::Update => "Error al actualizar",
            Self::Delete => "Error al borrar",
            Self::SignIn => "Error al iniciar sesión",
            Self::SignUp => "Error al crear",
        }
    }
}

impl AppError {
    /// The notice shown to the user for this error.
    ///
    /// Validation failures are warnings titled with their own message.
    /// Service failures show the error code and message under the
    /// operation's title.
    #[must_use]
    pub fn notice(&self, operation: Operation) -> Notice {
        match self {
            Self::Validation(err) => Notice::warning(err.to_string(), ""),
            Self::Auth(err) => Notice::error(
                operation.failure_title(),
                format!("{}\n{}", err.code, err.message),
            ),
            Self::Store(err) | Self::Subscription { source: err, .. } => Notice::error(
                operation.failure_title(),
                format!("{}\n{}", err.code(), err),
            ),
            Self::UnknownRecord(_) | Self::Persistence(_) => {
                Notice::error(operation.failure_title(), self.to_string())
            }
        }
    }
}
