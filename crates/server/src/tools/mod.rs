//! MCP tool implementations.
//!
//! Each tool maps onto one bridge command and returns the bridge's answer
//! as JSON text.

pub mod change;
pub mod mode;
pub mod visited;

use revisit_core::{Error, Response};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};

/// Render a bridge response as a successful tool result.
pub(crate) fn respond(response: &Response) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| Error::InvalidValue(format!("failed to serialize response: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use revisit_core::history::{ManualClock, StaticHistory};
    use revisit_core::policy::MAX_LOOSE_DOMAINS;
    use revisit_core::sync::SyncOptions;
    use revisit_core::{Bridge, DomainPolicy, HistoryEntry, HistorySynchronizer, MemoryStore};
    use rmcp::model::CallToolResult;

    pub const NOW: i64 = 1_700_000_000_000;

    /// A bridge over a reconciled three-item history.
    pub async fn bridge() -> (Arc<HistorySynchronizer>, Bridge) {
        let history = Arc::new(StaticHistory::new(vec![
            HistoryEntry::new("Issues", "https://github.com/tokio-rs/tokio/issues", NOW - 1),
            HistoryEntry::new("Gist", "https://gist.github.com/abc", NOW - 2),
            HistoryEntry::new("Crate", "https://crates.io/crates/tokio", NOW - 3),
        ]));
        let policy = Arc::new(DomainPolicy::load(Arc::new(MemoryStore::default()), MAX_LOOSE_DOMAINS).await);
        let sync = Arc::new(HistorySynchronizer::new(
            history,
            Arc::new(ManualClock::new(NOW)),
            policy.clone(),
            SyncOptions::default(),
        ));
        sync.reconcile().await.unwrap();
        (sync.clone(), Bridge::new(sync, policy))
    }

    /// Parse the JSON text payload of a tool result.
    pub fn payload(result: &CallToolResult) -> serde_json::Value {
        let value = serde_json::to_value(result).unwrap();
        let text = value["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }
}
