use serde_json::{Map, Value};
use tracing::debug;

use crate::config::VizqlConfig;
use crate::error::ToolError;
use crate::metadata::{self, MetadataRequest};
use crate::query::QueryRequest;
use crate::relay::{HttpRelay, RelayCall};

/// User agent advertised on query-service calls.
pub const USER_AGENT: &str = concat!("vizql-mcp/", env!("CARGO_PKG_VERSION"));

const VIZQL_OPERATION: &str = "VizQL";
const METADATA_OPERATION: &str = "Metadata API";

/// The two bridge operations, bound to one configuration and one relay.
///
/// Each operation carries its own header set: the query path sends
/// `User-Agent` and `Accept`, the metadata path only `Content-Type` and the
/// auth header.
#[derive(Clone)]
pub struct VizqlBridge {
    config: VizqlConfig,
    relay: HttpRelay,
}

impl VizqlBridge {
    /// Creates a bridge whose relay signs calls with the configured token.
    #[must_use]
    pub fn new(config: VizqlConfig) -> Self {
        let relay = HttpRelay::new(config.auth_token.clone());
        Self { config, relay }
    }

    /// Replaces the relay, e.g. with one using a customized client.
    #[must_use]
    pub fn with_relay(mut self, relay: HttpRelay) -> Self {
        self.relay = relay;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &VizqlConfig {
        &self.config
    }

    /// Runs a caller-supplied query fragment against the configured
    /// datasource.
    ///
    /// The fragment is passed through unvalidated. Malformed queries surface
    /// as whatever error the query service returns.
    ///
    /// # Errors
    ///
    /// Fails with [`ToolError::Config`] when no auth token is configured; in
    /// that case no network call is made. Transport and status failures
    /// surface as the relay reports them.
    pub async fn query_datasource(&self, fragment: Map<String, Value>) -> Result<Value, ToolError> {
        self.require_token(VIZQL_OPERATION)?;
        let payload = QueryRequest::new(&self.config, fragment).to_value();
        let call = RelayCall::post(VIZQL_OPERATION, self.config.query_endpoint("query-datasource"))
            .with_header("User-Agent", USER_AGENT)
            .with_header("Accept", "application/json")
            .with_timeout(self.config.query_timeout)
            .with_body(payload);
        self.relay.execute(call).await
    }

    /// Fetches the field catalog for the configured datasource.
    ///
    /// # Errors
    ///
    /// Fails with [`ToolError::Config`] when no auth token is configured; in
    /// that case no network call is made. A decoded response that carries
    /// GraphQL errors or lacks the expected field list fails with
    /// [`ToolError::Upstream`] or [`ToolError::Shape`].
    pub async fn list_fields(&self) -> Result<Value, ToolError> {
        self.require_token(METADATA_OPERATION)?;
        let body = MetadataRequest::for_datasource(self.config.datasource_luid.clone()).to_value();
        let call = RelayCall::post(METADATA_OPERATION, self.config.metadata_url.clone())
            .with_timeout(self.config.metadata_timeout)
            .with_body(body);
        let response = self.relay.execute(call).await?;
        metadata::extract_fields(&response)
    }

    fn require_token(&self, operation: &'static str) -> Result<(), ToolError> {
        let configured = self
            .config
            .auth_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());
        if configured {
            Ok(())
        } else {
            debug!("rejecting {operation} call; no auth token is configured");
            Err(ToolError::config(
                "auth token is not configured; set TABLEAU_PAT or pass --auth-token",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> VizqlConfig {
        VizqlConfig::new("http://127.0.0.1:9/vizql", "http://127.0.0.1:9/metadata", "luid-1")
    }

    #[test]
    fn user_agent_carries_the_crate_version() {
        assert_eq!(
            USER_AGENT,
            format!("vizql-mcp/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[tokio::test]
    async fn missing_token_fails_both_tools_without_a_request() {
        let bridge = VizqlBridge::new(unreachable_config());

        let query = bridge.query_datasource(Map::new()).await.unwrap_err();
        assert!(matches!(query, ToolError::Config { .. }));

        let fields = bridge.list_fields().await.unwrap_err();
        assert!(matches!(fields, ToolError::Config { .. }));
    }

    #[tokio::test]
    async fn blank_token_counts_as_missing() {
        let bridge = VizqlBridge::new(unreachable_config().with_auth_token("   "));
        let error = bridge.query_datasource(Map::new()).await.unwrap_err();
        assert_eq!(
            error.to_value()["error"],
            "auth token is not configured; set TABLEAU_PAT or pass --auth-token"
        );
    }
}
