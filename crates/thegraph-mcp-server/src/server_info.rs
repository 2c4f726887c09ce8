use serde::Deserialize;

const DEFAULT_NAME: &str = "TheGraph MCP Server";
const DEFAULT_WEBSITE: &str = "https://thegraph.com/docs/en/";

/// Overrides for the implementation info sent in the MCP `initialize` response.
///
/// Unset fields fall back to this crate's name, version and docs link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerInfoConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub title: Option<String>,
    pub website_url: Option<String>,
}

impl ServerInfoConfig {
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string())
    }

    pub fn version(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    pub fn title(&self) -> Option<String> {
        self.title.clone().or_else(|| Some(DEFAULT_NAME.to_string()))
    }

    pub fn website_url(&self) -> Option<String> {
        self.website_url
            .clone()
            .or_else(|| Some(DEFAULT_WEBSITE.to_string()))
    }
}
