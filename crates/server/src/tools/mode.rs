//! update_mode and is_strict_mode tool implementations.

use revisit_core::{Bridge, Request};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::respond;

/// Parameters for the update_mode tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateModeParams {
    /// Hostname whose matching mode changes.
    pub domain: String,

    /// `true` matches the host exactly; `false` also matches every host
    /// under its registrable domain.
    pub strict: bool,
}

/// Parameters for the is_strict_mode tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IsStrictModeParams {
    /// Hostname to look up.
    pub domain: String,
}

/// Implementation of the update_mode tool.
pub async fn update_impl(bridge: &Bridge, params: UpdateModeParams) -> Result<CallToolResult, McpError> {
    let response = bridge
        .handle(Request::UpdateMode { domain: params.domain, strict: params.strict })
        .await;
    respond(&response)
}

/// Implementation of the is_strict_mode tool.
pub async fn is_strict_impl(bridge: &Bridge, params: IsStrictModeParams) -> Result<CallToolResult, McpError> {
    let response = bridge.handle(Request::IsStrictMode { domain: params.domain }).await;
    respond(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{bridge, payload};
    use crate::tools::visited::{GetVisitedItemsParams, get_impl};
    use serde_json::json;

    #[tokio::test]
    async fn test_default_is_strict() {
        let (_, bridge) = bridge().await;
        let result = is_strict_impl(&bridge, IsStrictModeParams { domain: "github.com".into() })
            .await
            .unwrap();
        assert_eq!(payload(&result), json!(true));
    }

    #[tokio::test]
    async fn test_loose_mode_widens_query() {
        let (_, bridge) = bridge().await;

        let ack = update_impl(&bridge, UpdateModeParams { domain: "github.com".into(), strict: false })
            .await
            .unwrap();
        assert_eq!(payload(&ack), json!(null));

        let result = is_strict_impl(&bridge, IsStrictModeParams { domain: "github.com".into() })
            .await
            .unwrap();
        assert_eq!(payload(&result), json!(false));

        let params = GetVisitedItemsParams { domain: Some("github.com".into()), url: None, limit: None };
        let items = payload(&get_impl(&bridge, params).await.unwrap());
        let titles: Vec<_> = items.as_array().unwrap().iter().map(|i| i["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Issues"), json!("Gist")]);
    }
}
