//! TeckAdm client core.
//!
//! Everything between the screens and the two hosted collaborators (the
//! authentication service and the document store):
//!
//! - [`session`] and [`routing`] - current identity as an observable value,
//!   and the guard that maps identity changes to routes
//! - [`store`] and [`live`] - owner-scoped live queries that deliver whole
//!   snapshots
//! - [`reconcile`] - snapshot replacement and the client picker default
//! - [`draft`] and [`dispatch`] - per-screen drafts, validation and writes
//! - [`screens`] and [`shell`] - the three record screens, torn down and
//!   rebuilt whenever the signed-in identity changes
//!
//! In-memory collaborators ([`auth::MemoryAuth`], [`store::MemoryStore`])
//! back the tests and the command-line front end through [`backend`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod draft;
pub mod error;
pub mod live;
pub mod notice;
pub mod reconcile;
pub mod routing;
pub mod screens;
pub mod session;
pub mod shell;
pub mod store;

pub use error::AppError;
pub use notice::{Notice, NoticeLevel, NoticeReceiver, Notices};
