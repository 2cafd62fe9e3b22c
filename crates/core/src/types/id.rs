//! Newtype ids for type-safe record references.
//!
//! Document ids are opaque strings assigned by the document store. The
//! `define_id!` macro wraps them per record kind so a ticket id can never be
//! passed where a client id is expected.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An untyped document id, as handed out by the document store.
///
/// Typed ids convert to and from this type, which is what the store
/// collaborator speaks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Macro to define a type-safe id wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()` and `into_inner()`
/// - conversions to and from [`DocumentId`], `String` and `&str`
///
/// # Example
///
/// ```rust
/// # use teckadm_core::define_id;
/// define_id!(InvoiceId);
/// define_id!(TechnicianId);
///
/// let invoice = InvoiceId::new("a1");
/// let tech = TechnicianId::new("a1");
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = tech;
/// assert_eq!(invoice.as_str(), tech.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::std::string::String);

        impl $name {
            /// Create a new id from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<::std::string::String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the id and returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> ::std::string::String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<::std::string::String> for $name {
            fn from(id: ::std::string::String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$crate::DocumentId> for $name {
            fn from(id: $crate::DocumentId) -> Self {
                Self(id.as_str().to_owned())
            }
        }

        impl From<$name> for $crate::DocumentId {
            fn from(id: $name) -> Self {
                $crate::DocumentId::new(id.0)
            }
        }

        impl From<&$name> for $crate::DocumentId {
            fn from(id: &$name) -> Self {
                $crate::DocumentId::new(id.0.clone())
            }
        }
    };
}

// Identity of the authenticated account that owns a record.
define_id!(OwnerId);
define_id!(ClientId);
define_id!(TicketId);
define_id!(QuoteId);
