use rmcp::{ErrorData, model::CallToolResult, tool, tool_router};

use crate::{VizqlMcp, helpers};

#[tool_router(router = tool_router_metadata, vis = "pub")]
impl VizqlMcp {
    #[tool(
        description = "List the configured datasource's fields (name and description) via Tableau's Metadata API."
    )]
    async fn list_fields(&self) -> Result<CallToolResult, ErrorData> {
        let outcome = self.bridge.list_fields().await;
        helpers::tool_outcome(outcome)
    }
}
