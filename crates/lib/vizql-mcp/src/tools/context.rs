use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    tool,
    tool_router,
};
use vizql_core::query::sample_query_fragments;

use crate::VizqlMcp;

#[tool_router(router = tool_router_context, vis = "pub")]
impl VizqlMcp {
    #[tool(
        description = "Sample VizQL query fragments covering aggregation, sorting, SET and RANGE filters, and limits. Adapt these when composing `query_datasource` calls."
    )]
    async fn query_examples(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(sample_query_fragments())?]))
    }
}
