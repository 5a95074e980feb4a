//! Chromium `History` database reader.
//!
//! The browser keeps its history database exclusively locked while it runs,
//! so the file is opened read-only with SQLite's `immutable` URI flag and a
//! fresh connection is used for every search (an immutable connection would
//! otherwise keep serving stale pages).

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, params, rusqlite::OpenFlags};

use super::HistorySource;
use crate::{Error, HistoryEntry};

/// Milliseconds between 1601-01-01 (WebKit epoch) and 1970-01-01.
const WEBKIT_EPOCH_OFFSET_MS: i64 = 11_644_473_600_000;

const SEARCH_SQL: &str = "SELECT title, url, last_visit_time FROM urls
     WHERE hidden = 0 AND last_visit_time >= ?1
     ORDER BY last_visit_time DESC";

/// Convert epoch milliseconds to WebKit microseconds.
pub fn to_webkit_micros(epoch_ms: i64) -> i64 {
    epoch_ms.saturating_add(WEBKIT_EPOCH_OFFSET_MS).saturating_mul(1_000)
}

/// Convert WebKit microseconds to epoch milliseconds.
pub fn from_webkit_micros(webkit_us: i64) -> i64 {
    webkit_us / 1_000 - WEBKIT_EPOCH_OFFSET_MS
}

/// History source backed by a Chromium-format `History` file.
#[derive(Debug, Clone)]
pub struct ChromeHistoryDb {
    uri: String,
}

impl ChromeHistoryDb {
    /// Point the reader at a `History` file. The file is not opened until
    /// the first search.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path)
            .map_err(|e| Error::InvalidInput(format!("history path {}: {e}", path.display())))?;
        let mut uri = ::url::Url::from_file_path(&absolute)
            .map_err(|_| Error::InvalidInput(format!("history path {} is not a file path", path.display())))?;
        uri.set_query(Some("immutable=1"));

        Ok(Self { uri: uri.into() })
    }

    async fn connect(&self) -> Result<Connection, Error> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Connection::open_with_flags(&self.uri, flags)
            .await
            .map_err(|e| Error::History(format!("cannot open {}: {e}", self.uri)))
    }
}

#[async_trait]
impl HistorySource for ChromeHistoryDb {
    async fn search(&self, start_time: i64) -> Result<Vec<HistoryEntry>, Error> {
        let conn = self.connect().await?;
        let since = to_webkit_micros(start_time);

        let entries = conn
            .call(move |conn| -> Result<Vec<HistoryEntry>, Error> {
                let mut stmt = conn.prepare(SEARCH_SQL)?;
                let rows = stmt.query_map(params![since], |row| {
                    Ok(HistoryEntry {
                        title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        url: row.get(1)?,
                        last_visit_time: from_webkit_micros(row.get(2)?),
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Error::from)
            })
            .await
            .map_err(|e| Error::History(e.to_string()))?;

        tracing::trace!(start_time, count = entries.len(), "searched history database");
        Ok(entries)
    }
}
