//! Key/value operations on the SQLite store.
//!
//! Values are stored as JSON text with UPSERT semantics.

use super::KeyValueStore;
use super::connection::SqliteStore;
use crate::Error;
use async_trait::async_trait;
use serde_json::Value;
use tokio_rusqlite::{params, rusqlite};

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let key = key.to_string();
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row("SELECT value_json FROM kv WHERE key = ?1", params![key], |row| row.get(0));

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        let key = key.to_string();
        let value_json = serde_json::to_string(&value)?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv (key, value_json, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value_json = excluded.value_json,
                        updated_at = excluded.updated_at",
                    params![key, value_json, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}
