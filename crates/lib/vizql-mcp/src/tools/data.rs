use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{VizqlMcp, helpers};

/// Parameters for running a query against the configured datasource.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueryDatasourceParams {
    /// Only the `query` part of the payload: fields, optional filters,
    /// optional limit. Everything else is injected by the server.
    pub query: Map<String, Value>,
}

#[tool_router(router = tool_router_data, vis = "pub")]
impl VizqlMcp {
    #[tool(
        description = "Run a Tableau VizQL query. Pass only the `query` part of the payload (fields, filters, limit); the datasource reference and output options are injected automatically."
    )]
    async fn query_datasource(
        &self,
        Parameters(params): Parameters<QueryDatasourceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self.bridge.query_datasource(params.query).await;
        helpers::tool_outcome(outcome)
    }
}
