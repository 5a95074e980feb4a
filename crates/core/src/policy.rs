//! Per-domain strict/loose matching policy.
//!
//! Every domain is strict (exact host matching) unless it has been toggled
//! into loose mode, in which case a query also matches every host under
//! the domain's registrable root. Loose domains are kept most recently
//! toggled first and capped so the persisted set cannot grow without bound.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::store::KeyValueStore;
use crate::url::{is_within, normalize_host, registrable_domain};

/// Key under which the loose-mode domain list is persisted.
pub const LOOSE_DOMAINS_KEY: &str = "looseModeDomains";

/// Default number of loose-mode domains remembered.
pub const MAX_LOOSE_DOMAINS: usize = 100;

/// How a domain-scoped query matches item domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainScope {
    /// Only items whose domain is exactly this host.
    Exact(String),
    /// The queried host plus everything under its registrable root.
    Registrable { host: String, root: String },
}

impl DomainScope {
    pub fn matches(&self, domain: &str) -> bool {
        match self {
            DomainScope::Exact(host) => domain == host,
            DomainScope::Registrable { host, root } => domain == host || is_within(domain, root),
        }
    }
}

/// Loose-mode exception set with write-through persistence.
pub struct DomainPolicy {
    store: Arc<dyn KeyValueStore>,
    loose: RwLock<VecDeque<String>>,
    cap: usize,
    persist: tokio::sync::Mutex<()>,
}

impl DomainPolicy {
    /// Load the persisted set.
    ///
    /// A store that cannot be read, or holds something other than a list of
    /// strings, yields an empty set: every domain starts out strict.
    pub async fn load(store: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        let loose = match store.get(LOOSE_DOMAINS_KEY).await {
            Ok(Some(value)) => decode(value, cap),
            Ok(None) => VecDeque::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read loose-mode domains; defaulting to strict");
                VecDeque::new()
            }
        };
        tracing::debug!(count = loose.len(), cap, "loaded domain mode policy");

        Self { store, loose: RwLock::new(loose), cap, persist: tokio::sync::Mutex::new(()) }
    }

    /// Whether queries for `domain` match its host exactly.
    pub fn is_strict(&self, domain: &str) -> bool {
        let host = normalize_host(domain);
        !self.loose.read().contains(&host)
    }

    /// Switch `domain` between strict and loose matching.
    ///
    /// The in-memory set changes before this returns; persistence failures
    /// are logged and otherwise ignored.
    pub async fn set_mode(&self, domain: &str, strict: bool) {
        let host = normalize_host(domain);
        if host.is_empty() {
            tracing::debug!("ignoring mode change for empty domain");
            return;
        }

        let _guard = self.persist.lock().await;
        let snapshot = {
            let mut loose = self.loose.write();
            if strict {
                loose.retain(|d| d != &host);
            } else if !loose.contains(&host) {
                loose.push_front(host.clone());
                loose.truncate(self.cap);
            }
            loose.iter().cloned().collect::<Vec<_>>()
        };

        if let Err(err) = self.store.set(LOOSE_DOMAINS_KEY, Value::from(snapshot)).await {
            tracing::warn!(error = %err, domain = %host, "failed to persist loose-mode domains");
        }
    }

    /// Matching rule for a query on `domain`.
    pub fn scope(&self, domain: &str) -> DomainScope {
        let host = normalize_host(domain);
        if self.is_strict(&host) {
            DomainScope::Exact(host)
        } else {
            let root = registrable_domain(&host);
            DomainScope::Registrable { host, root }
        }
    }

    /// Loose-mode domains, most recently toggled first.
    pub fn loose_domains(&self) -> Vec<String> {
        self.loose.read().iter().cloned().collect()
    }
}

fn decode(value: Value, cap: usize) -> VecDeque<String> {
    match serde_json::from_value::<Vec<String>>(value) {
        Ok(domains) => domains.into_iter().take(cap).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "persisted loose-mode domains are not a string list; ignoring");
            VecDeque::new()
        }
    }
}
