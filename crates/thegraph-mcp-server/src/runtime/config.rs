use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thegraph_mcp_server::gateway::{DEFAULT_GATEWAY_URL, DEFAULT_TIMEOUT};
use thegraph_mcp_server::server_info::ServerInfoConfig;
use thegraph_mcp_server::service::NETWORK_SUBGRAPH_ID;
use url::Url;

use super::logging::Logging;

/// Configuration for the MCP server
#[derive(Debug, Deserialize)]
pub struct Config {
    /// The Graph gateway API key. Tool calls that reach the gateway fail without it.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Base URL of the gateway. The API key and subgraph path are appended to it.
    #[serde(default)]
    pub gateway_url: Option<Url>,

    /// Subgraph indexing network metadata, used by subgraph search
    #[serde(default = "defaults::network_subgraph_id")]
    pub network_subgraph_id: String,

    /// Per-request timeout for gateway calls
    #[serde(default = "defaults::timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default)]
    pub logging: Logging,

    /// Metadata reported to clients on initialization
    #[serde(default)]
    pub server_info: ServerInfoConfig,
}

impl Config {
    /// The gateway base URL, always ending in `/` so the API key appends as a path segment.
    pub fn gateway_url(&self) -> Result<Url, url::ParseError> {
        let mut url = match &self.gateway_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_GATEWAY_URL)?,
        };
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

mod defaults {
    use std::time::Duration;

    pub(super) fn network_subgraph_id() -> String {
        super::NETWORK_SUBGRAPH_ID.to_string()
    }

    pub(super) fn timeout() -> Duration {
        super::DEFAULT_TIMEOUT
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, "https://gateway.thegraph.com/api/")]
    #[case(Some("http://localhost:7700/api"), "http://localhost:7700/api/")]
    #[case(Some("http://localhost:7700/api/"), "http://localhost:7700/api/")]
    fn gateway_url_ends_with_a_slash(#[case] configured: Option<&str>, #[case] expected: &str) {
        let config: Config = serde_json::from_value(json!({ "gateway_url": configured })).unwrap();

        assert_eq!(config.gateway_url().unwrap().as_str(), expected);
    }

    #[test]
    fn api_key_is_not_printed() {
        let config: Config = serde_json::from_value(json!({ "api_key": "hunter2" })).unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
