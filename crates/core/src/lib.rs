//! TeckAdm Core - Shared types library.
//!
//! This crate provides the types shared by every TeckAdm component:
//! - `client` - Session, live queries, drafts and mutations
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no
//! authentication. Records here mirror the documents persisted in the hosted
//! document store, field for field.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, money and ticket enums
//! - [`records`] - Client, ticket and quote records plus collection names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod records;
pub mod types;

pub use records::*;
pub use types::*;
