//! SQLite-backed durable store for snippets.
//!
//! The database is the source of truth; the in-memory cache in
//! [`crate::service`] only ever mirrors rows found here. Access goes through
//! tokio-rusqlite, which runs every call on a single background thread and
//! therefore serializes concurrent callers.

pub mod connection;
pub mod deadline;
pub mod migrations;
pub mod snippets;

pub use crate::Error;

pub use connection::SnippetDb;
pub use deadline::Deadline;
