//! HTTP client for The Graph gateway.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::errors::{ToolError, redact};

/// The public gateway for The Graph's decentralized network
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.thegraph.com/api/";

/// How long a single gateway request may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A GraphQL request body
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub query: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

/// Path of a subgraph relative to the keyed gateway URL
pub fn subgraph_path(subgraph_id: &str) -> String {
    format!("/subgraphs/id/{subgraph_id}")
}

/// Posts GraphQL documents to `<gateway_url><api_key><path>`.
///
/// One attempt per call, no retries. Any error text is scrubbed of the API key
/// before it leaves this type.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    gateway_url: Url,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(
        gateway_url: Url,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            gateway_url,
            api_key,
            timeout,
        })
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    /// POST a GraphQL request and return the decoded response body.
    ///
    /// A 2xx response carrying a non-empty `errors` array is reported as
    /// [`ToolError::Application`] with the first error's message.
    #[tracing::instrument(skip(self, request))]
    pub async fn post(&self, path: &str, request: &Request<'_>) -> Result<Value, ToolError> {
        let api_key = self.api_key.as_ref().ok_or(ToolError::ConfigurationMissing)?;
        let url = format!(
            "{}{}{}",
            self.gateway_url.as_str(),
            api_key.expose_secret(),
            path
        );

        debug!("Sending GraphQL request to gateway");
        let body = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.transport_error(e))?
            .json::<Value>()
            .await
            .map_err(|e| self.transport_error(e))?;

        if let Some(message) = first_graphql_error(&body) {
            let message = redact(&message, self.api_key.as_ref());
            warn!(%message, "Gateway returned GraphQL errors");
            return Err(ToolError::Application(message));
        }

        Ok(body)
    }

    fn transport_error(&self, error: reqwest::Error) -> ToolError {
        let message = redact(&error.to_string(), self.api_key.as_ref());
        warn!(%message, "Gateway request failed");
        ToolError::Transport(message)
    }
}

/// The message of the first entry in a non-empty top-level `errors` array
fn first_graphql_error(body: &Value) -> Option<String> {
    let first = body.get("errors")?.as_array()?.first()?;
    Some(
        first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string(),
    )
}
