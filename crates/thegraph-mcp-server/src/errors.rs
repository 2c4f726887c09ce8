use secrecy::{ExposeSecret, SecretString};

/// Marker substituted for the API key wherever it would appear in a message
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// The message returned by every tool when no API key is configured
pub const MISSING_API_KEY_MESSAGE: &str =
    "API key is required. Set THEGRAPH_API_KEY in your .env file.";

/// A failure inside one of the tool operations.
///
/// These never cross the tool boundary as errors: [`ToolError::into_tool_output`]
/// turns them into the text the calling agent sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    ConfigurationMissing,

    /// Connection, timeout, non-2xx or body decoding failure
    #[error("{0}")]
    Transport(String),

    /// The gateway answered 2xx but with a GraphQL `errors` array
    #[error("{0}")]
    Application(String),

    #[error("Failed to fetch schema for {subgraph_id}")]
    MissingSchema { subgraph_id: String },

    /// The response did not have the structure we rely on
    #[error("{0}")]
    Shape(String),
}

/// Which tool operation an error came from, used to prefix its message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchSchema,
    ExecuteQuery,
    SearchSubgraphs,
}

impl Operation {
    fn prefix(self) -> &'static str {
        match self {
            Operation::FetchSchema => "Error fetching schema",
            Operation::ExecuteQuery => "Error executing query",
            Operation::SearchSubgraphs => "Error searching subgraphs",
        }
    }
}

impl ToolError {
    /// Render this error as tool output, with the API key scrubbed from the text.
    pub fn into_tool_output(self, operation: Operation, api_key: Option<&SecretString>) -> String {
        let message = match self {
            ToolError::ConfigurationMissing | ToolError::MissingSchema { .. } => self.to_string(),
            ToolError::Application(message) => format!("GraphQL error: {message}"),
            ToolError::Transport(message) | ToolError::Shape(message) => {
                format!("{}: {message}", operation.prefix())
            }
        };
        redact(&message, api_key)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Shape(e.to_string())
    }
}

/// Replace every occurrence of the API key in `message` with [`REDACTION_MARKER`].
pub fn redact(message: &str, api_key: Option<&SecretString>) -> String {
    match api_key.map(ExposeSecret::expose_secret) {
        Some(key) if !key.is_empty() && message.contains(key) => {
            message.replace(key, REDACTION_MARKER)
        }
        _ => message.to_string(),
    }
}

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to initialize MCP server: {0}")]
    McpInitialize(#[from] Box<rmcp::service::ServerInitializeError>),

    #[error("MCP server stopped unexpectedly: {0}")]
    Serve(#[from] tokio::task::JoinError),
}

/// An MCP protocol error
pub type McpError = rmcp::model::ErrorData;
