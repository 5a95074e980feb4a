//! Request bridge between the presentation layer and the synchronizer.
//!
//! Requests are JSON objects tagged by `command`:
//!
//! ```json
//! {"command": "getVisitedItems", "domain": "docs.rs", "limit": 20}
//! {"command": "updateMode", "domain": "docs.rs", "strict": false}
//! {"command": "isStrictMode", "domain": "docs.rs"}
//! {"command": "externalChange", "kind": "visitRemoved"}
//! ```
//!
//! No request fails: bad input degrades to an empty list or a default.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::policy::DomainPolicy;
use crate::sync::{ChangeKind, HistorySynchronizer};
use crate::url::domain_for_tab;
use crate::VisitedItem;

/// A request from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    /// Recently visited items for a domain.
    ///
    /// When `domain` is absent it is derived from `url`, the page open in
    /// the current tab. Neither means every cached item.
    GetVisitedItems {
        #[serde(default)]
        domain: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        limit: Option<i64>,
    },
    /// Switch a domain between strict and loose matching.
    UpdateMode { domain: String, strict: bool },
    /// Whether a domain uses strict matching.
    IsStrictMode { domain: String },
    /// Forwarded browser history or tab event.
    ExternalChange { kind: ChangeKind },
}

/// The answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    VisitedItems(Vec<VisitedItem>),
    Strict(bool),
    Ack,
}

/// Dispatches requests to the synchronizer and the domain policy.
pub struct Bridge {
    sync: Arc<HistorySynchronizer>,
    policy: Arc<DomainPolicy>,
}

impl Bridge {
    pub fn new(sync: Arc<HistorySynchronizer>, policy: Arc<DomainPolicy>) -> Self {
        Self { sync, policy }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetVisitedItems { domain, url, limit } => {
                let domain = domain
                    .filter(|d| !d.trim().is_empty())
                    .or_else(|| url.as_deref().map(domain_for_tab));
                let items = self.sync.query(domain.as_deref(), limit);
                tracing::debug!(domain = domain.as_deref().unwrap_or(""), count = items.len(), "served visited items");
                Response::VisitedItems(items)
            }
            Request::UpdateMode { domain, strict } => {
                self.policy.set_mode(&domain, strict).await;
                tracing::info!(%domain, strict, "domain mode updated");
                Response::Ack
            }
            Request::IsStrictMode { domain } => Response::Strict(self.policy.is_strict(&domain)),
            Request::ExternalChange { kind } => {
                self.sync.on_external_change(kind);
                Response::Ack
            }
        }
    }
}
