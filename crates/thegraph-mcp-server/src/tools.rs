//! MCP tools exposing The Graph to an AI agent.

pub(crate) mod query;
pub(crate) mod schema;
pub(crate) mod search;

use rmcp::model::{CallToolResult, Content};

/// Wrap a tool's text output. Failures are reported in the text itself.
fn text_result(output: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(output)])
}
