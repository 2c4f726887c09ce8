//! The MCP server fronting the subgraph tools.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorCode, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt as _, transport::stdio};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::errors::{McpError, ServerError};
use crate::server_info::ServerInfoConfig;
use crate::service::SubgraphService;
use crate::tools::{
    query::{QUERY_SUBGRAPH_TOOL_NAME, QuerySubgraph},
    schema::{GET_SUBGRAPH_SCHEMA_TOOL_NAME, GetSubgraphSchema},
    search::{SEARCH_SUBGRAPHS_TOOL_NAME, SearchSubgraphs},
};

/// An MCP server exposing The Graph subgraph tools over stdio
#[derive(Clone)]
pub struct Server {
    schema_tool: GetSubgraphSchema,
    query_tool: QuerySubgraph,
    search_tool: SearchSubgraphs,
    server_info: ServerInfoConfig,
}

impl Server {
    pub fn new(service: SubgraphService, server_info: ServerInfoConfig) -> Self {
        Self {
            schema_tool: GetSubgraphSchema::new(service.clone()),
            query_tool: QuerySubgraph::new(service.clone()),
            search_tool: SearchSubgraphs::new(service),
            server_info,
        }
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting MCP server in stdio mode");
        let service = self
            .serve(stdio())
            .await
            .inspect_err(|e| error!("serving error: {:?}", e))
            .map_err(Box::new)?;
        let reason = service.waiting().await?;
        info!(?reason, "MCP server stopped");
        Ok(())
    }

    fn list_tools_impl(&self) -> ListToolsResult {
        ListToolsResult {
            next_cursor: None,
            tools: vec![
                self.schema_tool.tool.clone(),
                self.query_tool.tool.clone(),
                self.search_tool.tool.clone(),
            ],
            ..Default::default()
        }
    }

    async fn call_tool_impl(
        &self,
        tool_name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool_name, "Calling tool");
        match tool_name {
            GET_SUBGRAPH_SCHEMA_TOOL_NAME => {
                Ok(self.schema_tool.execute(convert_arguments(arguments)?).await)
            }
            QUERY_SUBGRAPH_TOOL_NAME => {
                Ok(self.query_tool.execute(convert_arguments(arguments)?).await)
            }
            SEARCH_SUBGRAPHS_TOOL_NAME => {
                Ok(self.search_tool.execute(convert_arguments(arguments)?).await)
            }
            _ => Err(tool_not_found(tool_name)),
        }
    }
}

impl ServerHandler for Server {
    #[tracing::instrument(skip_all, fields(tool_name = request.name.as_ref()))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call_tool_impl(&request.name, request.arguments).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(self.list_tools_impl())
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.server_info.name(),
                icons: None,
                title: self.server_info.title(),
                version: self.server_info.version(),
                website_url: self.server_info.website_url(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {name} not found"),
        None,
    )
}

fn convert_arguments<T: serde::de::DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    serde_json::from_value(Value::from(arguments))
        .map_err(|e| McpError::new(ErrorCode::INVALID_PARAMS, format!("Invalid input: {e}"), None))
}
