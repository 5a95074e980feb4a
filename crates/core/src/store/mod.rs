//! Key/value persistence for state that must outlive the process.
//!
//! The visited-item cache itself is never persisted; only small settings
//! such as the loose-mode domain set go through a [`KeyValueStore`].
//!
//! - [`SqliteStore`]: SQLite file with WAL mode and schema migrations
//! - [`MemoryStore`]: process-local map for tests and ephemeral runs

pub mod connection;
pub mod kv;
pub mod migrations;

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::Error;

pub use connection::SqliteStore;

/// Async key/value persistence with last-write-wins semantics.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), Error>;
}

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("domains", json!(["a.example.com"])).await.unwrap();
        store.set("domains", json!(["b.example.com"])).await.unwrap();

        assert_eq!(store.get("domains").await.unwrap(), Some(json!(["b.example.com"])));
    }
}
