//! Visited item records.
//!
//! A [`HistoryEntry`] is a raw row as returned by a history source; a
//! [`VisitedItem`] is the cached form with its fingerprint key and domain.

pub mod hash;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use hash::compute_item_key;

use crate::url::domain_of;

/// One row from the external history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub title: String,
    pub url: String,
    /// Epoch milliseconds of the most recent visit.
    pub last_visit_time: i64,
}

impl HistoryEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>, last_visit_time: i64) -> Self {
        Self { title: title.into(), url: url.into(), last_visit_time }
    }
}

/// A deduplicated entry in the visited-item cache.
///
/// Two items with the same `key` are the same logical page even when their
/// raw URLs differ in query string or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitedItem {
    pub key: i32,
    /// Hostname of `url`; empty when the URL cannot be parsed.
    pub domain: String,
    pub title: String,
    pub url: String,
    pub last_visit_time: i64,
}

impl VisitedItem {
    pub fn from_entry(entry: HistoryEntry) -> Self {
        let HistoryEntry { title, url, last_visit_time } = entry;
        Self { key: compute_item_key(&title, &url), domain: domain_of(&url), title, url, last_visit_time }
    }
}

impl From<HistoryEntry> for VisitedItem {
    fn from(entry: HistoryEntry) -> Self {
        Self::from_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entry() {
        let item = VisitedItem::from_entry(HistoryEntry::new("Rust", "https://www.rust-lang.org/learn?x=1", 42));
        assert_eq!(item.domain, "www.rust-lang.org");
        assert_eq!(item.title, "Rust");
        assert_eq!(item.url, "https://www.rust-lang.org/learn?x=1");
        assert_eq!(item.last_visit_time, 42);
        assert_eq!(item.key, compute_item_key("Rust", "https://www.rust-lang.org/learn"));
    }

    #[test]
    fn test_from_entry_unparsable_url() {
        let item = VisitedItem::from_entry(HistoryEntry::new("", "invalid_domain/xxx", 1));
        assert_eq!(item.domain, "");
        assert_eq!(item.url, "invalid_domain/xxx");
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = VisitedItem::from_entry(HistoryEntry::new("T", "https://example.com/", 7));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["lastVisitTime"], 7);
        assert_eq!(json["domain"], "example.com");
        assert!(json.get("last_visit_time").is_none());
    }
}
