use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ceiling for `VizQL` query calls.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default ceiling for Metadata API calls.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(20);

const VIZQL_PATH: &str = "api/v1/vizql-data-service";
const METADATA_PATH: &str = "api/metadata/graphql";

/// Derives the `VizQL` Data Service base URL from a Tableau server root.
#[must_use]
pub fn vizql_url_for_server(server_url: &str) -> String {
    let root = server_url.trim_end_matches('/');
    format!("{root}/{VIZQL_PATH}")
}

/// Derives the Metadata API URL from a Tableau server root.
#[must_use]
pub fn metadata_url_for_server(server_url: &str) -> String {
    let root = server_url.trim_end_matches('/');
    format!("{root}/{METADATA_PATH}")
}

/// Output shape requested from the `VizQL` Data Service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnFormat {
    #[default]
    Objects,
    Arrays,
}

/// Fixed output options sent with every query payload.
///
/// Set once at startup from configuration and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    pub return_format: ReturnFormat,
    pub debug: bool,
    pub disaggregate: bool,
}

/// Immutable process-wide configuration for the bridge.
///
/// Constructed once at startup and passed explicitly to every component;
/// nothing here changes after construction.
#[derive(Clone)]
pub struct VizqlConfig {
    pub vizql_url: String,
    pub metadata_url: String,
    pub datasource_luid: String,
    pub auth_token: Option<String>,
    pub options: QueryOptions,
    pub query_timeout: Duration,
    pub metadata_timeout: Duration,
}

impl VizqlConfig {
    /// Creates a configuration with default options and timeouts.
    #[must_use]
    pub fn new(
        vizql_url: impl Into<String>,
        metadata_url: impl Into<String>,
        datasource_luid: impl Into<String>,
    ) -> Self {
        Self {
            vizql_url: vizql_url.into(),
            metadata_url: metadata_url.into(),
            datasource_luid: datasource_luid.into(),
            auth_token: None,
            options: QueryOptions::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    #[must_use]
    pub const fn with_metadata_timeout(mut self, metadata_timeout: Duration) -> Self {
        self.metadata_timeout = metadata_timeout;
        self
    }

    /// Joins the query-service base with a path suffix.
    #[must_use]
    pub fn query_endpoint(&self, path: &str) -> String {
        let base = self.vizql_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_endpoint_joins_base_and_path() {
        let config = VizqlConfig::new(
            "https://tableau.example.com/api/v1/vizql-data-service/",
            "https://tableau.example.com/api/metadata/graphql",
            "luid-1",
        );
        assert_eq!(
            config.query_endpoint("/query-datasource"),
            "https://tableau.example.com/api/v1/vizql-data-service/query-datasource"
        );
    }

    #[test]
    fn server_url_derivations_trim_trailing_slashes() {
        assert_eq!(
            vizql_url_for_server("https://tableau.example.com/"),
            "https://tableau.example.com/api/v1/vizql-data-service"
        );
        assert_eq!(
            metadata_url_for_server("https://tableau.example.com"),
            "https://tableau.example.com/api/metadata/graphql"
        );
    }

    #[test]
    fn default_options_serialize_to_the_fixed_shape() {
        assert_eq!(
            json!(QueryOptions::default()),
            json!({ "returnFormat": "OBJECTS", "debug": false, "disaggregate": false })
        );
    }

    #[test]
    fn builders_override_defaults() {
        let options = QueryOptions {
            return_format: ReturnFormat::Arrays,
            debug: true,
            disaggregate: true,
        };
        let config = VizqlConfig::new("http://v", "http://m", "luid-1")
            .with_auth_token("token-1")
            .with_options(options)
            .with_query_timeout(Duration::from_secs(3))
            .with_metadata_timeout(Duration::from_secs(9));

        assert_eq!(config.auth_token.as_deref(), Some("token-1"));
        assert_eq!(config.options, options);
        assert_eq!(config.query_timeout, Duration::from_secs(3));
        assert_eq!(config.metadata_timeout, Duration::from_secs(9));
    }

    #[test]
    fn new_applies_documented_defaults() {
        let config = VizqlConfig::new("http://v", "http://m", "luid-1");
        assert!(config.auth_token.is_none());
        assert_eq!(config.options.return_format, ReturnFormat::Objects);
        assert_eq!(config.query_timeout, DEFAULT_QUERY_TIMEOUT);
        assert_eq!(config.metadata_timeout, DEFAULT_METADATA_TIMEOUT);
    }
}
