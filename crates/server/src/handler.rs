//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the bridge.
use std::sync::Arc;

use crate::tools::change::{ExternalChangeParams, change_impl};
use crate::tools::mode::{IsStrictModeParams, UpdateModeParams, is_strict_impl, update_impl};
use crate::tools::visited::{GetVisitedItemsParams, get_impl};

use revisit_core::Bridge;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for revisit.
#[derive(Clone)]
pub struct RevisitServer {
    bridge: Arc<Bridge>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl RevisitServer {
    /// Create a new server handler.
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge, tool_router: Self::tool_router() }
    }

    /// List recently visited pages for a domain.
    ///
    /// Strict domains match their host exactly; loose domains also match
    /// sibling subdomains under the same registrable domain.
    #[tool(description = "List recently visited pages for a domain (or the current tab's URL), most recent first. \
                          Returns JSON items with key, domain, title, url and lastVisitTime.")]
    async fn get_visited_items(&self, params: Parameters<GetVisitedItemsParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.bridge, params.0).await
    }

    #[tool(description = "Switch a domain between strict (exact host) and loose (whole registrable domain) matching.")]
    async fn update_mode(&self, params: Parameters<UpdateModeParams>) -> Result<CallToolResult, McpError> {
        update_impl(&self.bridge, params.0).await
    }

    #[tool(description = "Check whether a domain uses strict matching. Domains are strict unless made loose.")]
    async fn is_strict_mode(&self, params: Parameters<IsStrictModeParams>) -> Result<CallToolResult, McpError> {
        is_strict_impl(&self.bridge, params.0).await
    }

    /// Forward a browser history or tab event.
    ///
    /// The cache is refreshed on the next reconciliation tick; removed
    /// visits force a full resync.
    #[tool(description = "Notify the host of a browser event: visitRecorded, visitRemoved or tabChanged.")]
    async fn external_change(&self, params: Parameters<ExternalChangeParams>) -> Result<CallToolResult, McpError> {
        change_impl(&self.bridge, params.0).await
    }
}

impl ServerHandler for RevisitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "revisit".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Recently visited pages from the browser history, scoped per domain. \
                 Use is_strict_mode/update_mode to control subdomain matching."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::bridge;

    #[tokio::test]
    async fn test_all_tools_registered() {
        let (_, bridge) = bridge().await;
        let server = RevisitServer::new(Arc::new(bridge));

        let mut names: Vec<_> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["external_change", "get_visited_items", "is_strict_mode", "update_mode"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let (_, bridge) = bridge().await;
        let info = RevisitServer::new(Arc::new(bridge)).get_info();
        assert_eq!(info.server_info.name, "revisit");
        assert!(info.capabilities.tools.is_some());
    }
}
