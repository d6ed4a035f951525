use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DEFAULT_QUERY_TIMEOUT;
use crate::error::ToolError;

/// Header carrying the Tableau session token.
pub const AUTH_HEADER: &str = "X-Tableau-Auth";

/// One outbound HTTP call, fully described before it is sent.
///
/// Each operation supplies its own header set and timeout; the relay adds
/// nothing on top except the auth header.
#[derive(Clone)]
pub struct RelayCall {
    pub operation: &'static str,
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub timeout: Duration,
    pub body: Option<Value>,
    pub auth_token: Option<String>,
}

impl RelayCall {
    #[must_use]
    pub fn new(operation: &'static str, method: Method, url: impl Into<String>) -> Self {
        Self {
            operation,
            method,
            url: url.into(),
            headers: Vec::new(),
            timeout: DEFAULT_QUERY_TIMEOUT,
            body: None,
            auth_token: None,
        }
    }

    #[must_use]
    pub fn post(operation: &'static str, url: impl Into<String>) -> Self {
        Self::new(operation, Method::POST, url)
    }

    #[must_use]
    pub fn get(operation: &'static str, url: impl Into<String>) -> Self {
        Self::new(operation, Method::GET, url)
    }

    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the relay's default token for this call only.
    #[must_use]
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }
}

/// Executes relay calls over one shared HTTP client.
#[derive(Clone)]
pub struct HttpRelay {
    client: Client,
    default_token: Option<String>,
}

impl HttpRelay {
    #[must_use]
    pub fn new(default_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            default_token,
        }
    }

    /// Swaps the HTTP client, e.g. for a test client with proxies disabled.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Performs one call and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Status`] when the upstream answers outside the
    /// success range, with the response body as the detail. Every other
    /// failure, including timeouts and undecodable bodies, surfaces as
    /// [`ToolError::Transport`] with the stringified cause. Nothing is
    /// retried.
    pub async fn execute(&self, call: RelayCall) -> Result<Value, ToolError> {
        let RelayCall {
            operation,
            method,
            url,
            headers,
            timeout,
            body,
            auth_token,
        } = call;
        debug!("relaying {operation} request to {url}");

        let mut request = self.client.request(method, &url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let token = auth_token.or_else(|| self.default_token.clone());
        if let Some(token) = token {
            request = request.header(AUTH_HEADER, token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            warn!("{operation} request failed: {err}");
            ToolError::transport(operation, err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{operation} request returned status {status}");
            let detail = response.text().await.unwrap_or_else(|_| "unknown".into());
            return Err(ToolError::Status {
                operation,
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json()
            .await
            .map_err(|err| ToolError::transport(operation, err))
    }
}
