use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema_from_type;
use crate::service::SubgraphService;

use super::text_result;

/// The name of the tool to execute a GraphQL query against a subgraph
pub const QUERY_SUBGRAPH_TOOL_NAME: &str = "querySubgraph";

#[derive(Clone)]
pub struct QuerySubgraph {
    service: SubgraphService,
    pub tool: Tool,
}

/// Input for the querySubgraph tool.
#[derive(JsonSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// The ID of the subgraph to query
    subgraph_id: String,

    /// The GraphQL query to execute
    query: String,
}

impl QuerySubgraph {
    pub fn new(service: SubgraphService) -> Self {
        Self {
            service,
            tool: Tool::new(
                QUERY_SUBGRAPH_TOOL_NAME,
                "Execute a GraphQL query against a subgraph and return the JSON response. Use `getSubgraphSchema` first so the query only uses fields the subgraph defines.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Input) -> CallToolResult {
        text_result(
            self.service
                .query_subgraph_output(&input.subgraph_id, &input.query)
                .await,
        )
    }
}
