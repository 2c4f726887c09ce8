use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema_from_type;
use crate::service::SubgraphService;

use super::text_result;

/// The name of the tool to fetch a subgraph's schema
pub const GET_SUBGRAPH_SCHEMA_TOOL_NAME: &str = "getSubgraphSchema";

/// A tool to fetch the schema of a subgraph through GraphQL introspection.
#[derive(Clone)]
pub struct GetSubgraphSchema {
    service: SubgraphService,
    pub tool: Tool,
}

/// Input for the getSubgraphSchema tool.
#[derive(JsonSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// The ID of the subgraph to inspect
    subgraph_id: String,

    /// Return the schema as GraphQL text instead of introspection JSON
    #[serde(default)]
    as_text: bool,
}

impl GetSubgraphSchema {
    pub fn new(service: SubgraphService) -> Self {
        Self {
            service,
            tool: Tool::new(
                GET_SUBGRAPH_SCHEMA_TOOL_NAME,
                "Fetch the schema of a subgraph using GraphQL introspection. Set `asText` to get GraphQL type definitions instead of the raw introspection JSON. Look at the schema before writing queries for `querySubgraph`.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Input) -> CallToolResult {
        text_result(
            self.service
                .get_subgraph_schema_output(&input.subgraph_id, input.as_text)
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn as_text_defaults_to_false() {
        let input: Input = serde_json::from_value(json!({ "subgraphId": "abc" })).unwrap();

        assert_eq!(input.subgraph_id, "abc");
        assert!(!input.as_text);
    }

    #[test]
    fn subgraph_id_is_required() {
        assert!(serde_json::from_value::<Input>(json!({ "asText": true })).is_err());
    }
}
