//! MCP tool to search subgraphs on The Graph Network.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema_from_type;
use crate::service::SubgraphService;

use super::text_result;

/// The name of the tool to search for subgraphs
pub const SEARCH_SUBGRAPHS_TOOL_NAME: &str = "searchSubgraphs";

#[derive(Clone)]
pub struct SearchSubgraphs {
    service: SubgraphService,
    pub tool: Tool,
}

/// Input for the searchSubgraphs tool.
#[derive(JsonSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Term to match against subgraph names and descriptions
    search_query: String,
}

impl SearchSubgraphs {
    pub fn new(service: SubgraphService) -> Self {
        Self {
            service,
            tool: Tool::new(
                SEARCH_SUBGRAPHS_TOOL_NAME,
                "Search for subgraphs on The Graph Network by name or description. Returns up to 20 deployed subgraphs with their IDs, names, networks and signal, highest signal first.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Input) -> CallToolResult {
        text_result(self.service.search_subgraphs_output(&input.search_query).await)
    }
}
