//! Core types and shared functionality for revisit.
//!
//! This crate provides:
//! - The history synchronizer and its in-memory visited-item cache
//! - Per-domain strict/loose matching policy
//! - Key/value persistence with SQLite backend
//! - History sources (Chromium `History` database, static lists)
//! - The request bridge consumed by the presentation layer
//! - Unified error types
//! - Configuration structures

pub mod bridge;
pub mod config;
pub mod error;
pub mod history;
pub mod item;
pub mod policy;
pub mod store;
pub mod sync;
pub mod url;

pub use bridge::{Bridge, Request, Response};
pub use error::Error;
pub use history::{Clock, HistorySource, SystemClock};
pub use item::{HistoryEntry, VisitedItem};
pub use policy::DomainPolicy;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use sync::{ChangeKind, HistorySynchronizer};
