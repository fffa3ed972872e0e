//! Core storage layer for binp, a time-limited snippet store.
//!
//! This crate provides:
//! - A fixed-capacity LRU cache kept coherent with a SQLite durable store
//! - Expiry-on-read, burn-after-read and periodic sweep policies
//! - Unified error types
//! - Configuration structures

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod lru;
pub mod service;
pub mod snippet;
pub mod sweeper;

pub use config::AppConfig;
pub use db::SnippetDb;
pub use error::Error;
pub use service::{SnippetService, SnippetServiceBuilder};
pub use snippet::{ExpiryClass, Language, Snippet};
pub use sweeper::Sweeper;
