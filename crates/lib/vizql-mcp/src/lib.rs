//! MCP server implementation for vizql-mcp.
//!
//! This crate wires the `VizQL` bridge into rmcp tool handlers and exposes
//! the MCP-facing surface: the query and field-catalog tools plus the stdio
//! and streamable HTTP runners.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use vizql_core::bridge::VizqlBridge;

const SERVER_INSTRUCTIONS: &str = r#"vizql-mcp bridges MCP tools to Tableau's VizQL Data Service and Metadata API for one configured datasource.

Workflow:
1. Call `list_fields` to inspect the datasource's field catalog (names and descriptions).
2. Call `query_examples` for sample query fragments covering aggregation, sorting, filters, and limits.
3. Call `query_datasource` with only the `query` part of a VizQL payload, e.g.
   {"fields": [{"fieldCaption": "Sales", "function": "SUM"}]}.
   The datasource reference and output options are injected by the server.

Notes:
- Query results are relayed verbatim as JSON rows (returnFormat OBJECTS unless configured otherwise).
- Failures come back as tool results carrying a JSON object tagged with a `kind` field
  (config, status, transport, upstream, shape), never as protocol errors.
- `health` returns `ok`."#;

/// MCP server wrapper around the bridge and tool routers.
#[derive(Clone)]
pub struct VizqlMcp {
    tool_router: ToolRouter<Self>,
    bridge: Arc<VizqlBridge>,
}

impl VizqlMcp {
    /// Creates a new server owning its bridge.
    #[must_use]
    pub fn new(bridge: VizqlBridge) -> Self {
        Self::with_bridge(Arc::new(bridge))
    }

    /// Creates a new server using a shared bridge handle.
    #[must_use]
    pub fn with_bridge(bridge: Arc<VizqlBridge>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_data()
            + Self::tool_router_metadata()
            + Self::tool_router_context();
        Self {
            tool_router,
            bridge,
        }
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl VizqlMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for VizqlMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizql_core::config::VizqlConfig;

    fn test_service() -> VizqlMcp {
        let config = VizqlConfig::new("http://127.0.0.1:9/v", "http://127.0.0.1:9/m", "luid-1");
        VizqlMcp::new(VizqlBridge::new(config))
    }

    #[test]
    fn router_registers_the_four_tools() {
        let service = test_service();
        for name in ["health", "query_datasource", "list_fields", "query_examples"] {
            assert!(service.tool_router.has_route(name), "missing tool {name}");
        }
    }

    #[test]
    fn server_info_advertises_tools_and_instructions() {
        let info = test_service().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some_and(|text| text.contains("query_datasource")));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let result = test_service().health().await.unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
