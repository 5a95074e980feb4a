//! external_change tool implementation.
//!
//! Lets a native-messaging shim forward browser history and tab events.

use revisit_core::{Bridge, ChangeKind, Request};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::respond;

/// Parameters for the external_change tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExternalChangeParams {
    /// What happened: `visitRecorded`, `visitRemoved` or `tabChanged`.
    pub kind: ChangeKind,
}

/// Implementation of the external_change tool.
pub async fn change_impl(bridge: &Bridge, params: ExternalChangeParams) -> Result<CallToolResult, McpError> {
    let response = bridge.handle(Request::ExternalChange { kind: params.kind }).await;
    respond(&response)
}
