//! get_visited_items tool implementation.
//!
//! Returns recently visited pages for a domain, most recent first.

use revisit_core::{Bridge, Request};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::respond;

/// Parameters for the get_visited_items tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetVisitedItemsParams {
    /// Hostname to scope results to. Omit for every cached item.
    #[serde(default)]
    pub domain: Option<String>,

    /// URL of the page open in the current tab; used when `domain` is omitted.
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum number of items. Zero or negative means no limit.
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Implementation of the get_visited_items tool.
pub async fn get_impl(bridge: &Bridge, params: GetVisitedItemsParams) -> Result<CallToolResult, McpError> {
    let GetVisitedItemsParams { domain, url, limit } = params;
    let response = bridge.handle(Request::GetVisitedItems { domain, url, limit }).await;
    respond(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{bridge, payload};

    #[tokio::test]
    async fn test_get_impl_by_domain() {
        let (_, bridge) = bridge().await;
        let params = GetVisitedItemsParams { domain: Some("github.com".into()), url: None, limit: None };

        let result = get_impl(&bridge, params).await.unwrap();
        let items = payload(&result);
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["title"], "Issues");
        assert_eq!(items[0]["domain"], "github.com");
        assert!(items[0]["lastVisitTime"].is_i64());
    }

    #[tokio::test]
    async fn test_get_impl_everything_with_limit() {
        let (_, bridge) = bridge().await;
        let params = GetVisitedItemsParams { domain: None, url: None, limit: Some(2) };

        let result = get_impl(&bridge, params).await.unwrap();
        assert_eq!(payload(&result).as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_impl_unknown_domain_is_empty() {
        let (_, bridge) = bridge().await;
        let params = GetVisitedItemsParams { domain: Some("example.com".into()), url: None, limit: None };

        let result = get_impl(&bridge, params).await.unwrap();
        assert_eq!(payload(&result), serde_json::json!([]));
    }
}
