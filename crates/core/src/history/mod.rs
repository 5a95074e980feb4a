//! External history sources.
//!
//! The synchronizer never talks to a browser directly. It asks a
//! [`HistorySource`] for every entry visited at or after a start time and
//! trusts the answer as authoritative.

pub mod chrome;
pub mod clock;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Error, HistoryEntry};

pub use chrome::ChromeHistoryDb;
pub use clock::{Clock, ManualClock, SystemClock};

/// Authoritative, externally mutated browsing history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// All entries with a visit time `>= start_time` (epoch ms), most recent first.
    async fn search(&self, start_time: i64) -> Result<Vec<HistoryEntry>, Error>;
}

/// History held in memory, for dry runs and tests.
///
/// Every search is recorded so callers can inspect which windows were
/// requested.
#[derive(Debug, Default)]
pub struct StaticHistory {
    entries: Mutex<Vec<HistoryEntry>>,
    searches: Mutex<Vec<i64>>,
}

impl StaticHistory {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries: Mutex::new(entries), searches: Mutex::default() }
    }

    /// Start times of all searches so far, oldest first.
    pub fn searches(&self) -> Vec<i64> {
        self.searches.lock().clone()
    }
}

#[cfg(test)]
impl StaticHistory {
    /// Record a visit.
    pub(crate) fn push(&self, entry: HistoryEntry) {
        self.entries.lock().push(entry);
    }

    /// Delete every entry for `url`. Returns how many were removed.
    pub(crate) fn remove_url(&self, url: &str) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| entry.url != url);
        before - entries.len()
    }
}

#[async_trait]
impl HistorySource for StaticHistory {
    async fn search(&self, start_time: i64) -> Result<Vec<HistoryEntry>, Error> {
        self.searches.lock().push(start_time);

        let mut found: Vec<HistoryEntry> = self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.last_visit_time >= start_time)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.last_visit_time.cmp(&a.last_visit_time));
        Ok(found)
    }
}
