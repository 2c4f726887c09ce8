//! The three subgraph tool operations.
//!
//! Each operation has a typed form returning `Result<String, ToolError>` and a
//! boundary form that always yields the text handed back to the agent.

use std::sync::Arc;
use std::time::Duration;

use bon::bon;
use secrecy::SecretString;
use serde_json::{Value, json};
use tracing::{debug, info};
use url::Url;

use crate::cache::{SchemaCache, SchemaCacheEntry};
use crate::errors::{Operation, ToolError};
use crate::gateway::{DEFAULT_TIMEOUT, GatewayClient, Request, subgraph_path};
use crate::schema_text::{INTROSPECTION_QUERY, IntrospectionSchema};
use crate::search_results::{SEARCH_QUERY, project, search_data};

/// The Graph Network subgraph, which indexes metadata about every subgraph on the network
pub const NETWORK_SUBGRAPH_ID: &str = "DZz4kDTdmzWLWsV373w2bSmoar3umKKH9y82SUKr5qmp";

/// Schema, query and search operations against The Graph gateway.
///
/// Holds the only state that outlives a call: the schema cache.
#[derive(Clone)]
pub struct SubgraphService {
    gateway: GatewayClient,
    cache: Arc<SchemaCache>,
    network_subgraph_id: String,
}

#[bon]
impl SubgraphService {
    #[builder]
    pub fn new(
        gateway_url: Url,
        api_key: Option<SecretString>,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
        #[builder(default = NETWORK_SUBGRAPH_ID.to_string(), into)] network_subgraph_id: String,
        #[builder(default)] cache: Arc<SchemaCache>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            gateway: GatewayClient::new(gateway_url, api_key, timeout)?,
            cache,
            network_subgraph_id,
        })
    }
}

impl SubgraphService {
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Fetch a subgraph's schema, as SDL-style text or as introspection JSON.
    #[tracing::instrument(skip(self))]
    pub async fn get_subgraph_schema(
        &self,
        subgraph_id: &str,
        as_text: bool,
    ) -> Result<String, ToolError> {
        if let Some(cached) = self
            .cache
            .get(subgraph_id)
            .and_then(|entry| entry.form(as_text).map(str::to_string))
        {
            debug!("Serving schema from cache");
            return Ok(cached);
        }

        let response = self
            .gateway
            .post(
                &subgraph_path(subgraph_id),
                &Request {
                    query: INTROSPECTION_QUERY,
                    variables: None,
                },
            )
            .await?;

        let schema = response
            .get("data")
            .and_then(|data| data.get("__schema"))
            .filter(|schema| !schema.is_null())
            .cloned()
            .ok_or_else(|| ToolError::MissingSchema {
                subgraph_id: subgraph_id.to_string(),
            })?;

        let json_schema = serde_json::to_string(&schema)?;
        let text_schema = IntrospectionSchema::from_value(schema)?.to_text()?;

        self.cache.put(
            subgraph_id,
            SchemaCacheEntry {
                text: Some(text_schema.clone()),
                json: Some(json_schema.clone()),
            },
        );
        info!("Cached schema");

        Ok(if as_text { text_schema } else { json_schema })
    }

    /// Run a caller-supplied GraphQL document against a subgraph, verbatim.
    #[tracing::instrument(skip(self, query))]
    pub async fn query_subgraph(&self, subgraph_id: &str, query: &str) -> Result<String, ToolError> {
        let response = self
            .gateway
            .post(
                &subgraph_path(subgraph_id),
                &Request {
                    query,
                    variables: None,
                },
            )
            .await?;

        Ok(serde_json::to_string(&response)?)
    }

    /// Full-text search over subgraph metadata on the network subgraph.
    #[tracing::instrument(skip(self))]
    pub async fn search_subgraphs(&self, search_query: &str) -> Result<String, ToolError> {
        let response: Value = self
            .gateway
            .post(
                &subgraph_path(&self.network_subgraph_id),
                &Request {
                    query: SEARCH_QUERY,
                    variables: Some(json!({ "text": search_query })),
                },
            )
            .await?;

        project(search_data(&response)?, &self.cache).into_text(search_query)
    }

    /// [`Self::get_subgraph_schema`] rendered as tool output
    pub async fn get_subgraph_schema_output(&self, subgraph_id: &str, as_text: bool) -> String {
        let result = self.get_subgraph_schema(subgraph_id, as_text).await;
        self.output(result, Operation::FetchSchema)
    }

    /// [`Self::query_subgraph`] rendered as tool output
    pub async fn query_subgraph_output(&self, subgraph_id: &str, query: &str) -> String {
        let result = self.query_subgraph(subgraph_id, query).await;
        self.output(result, Operation::ExecuteQuery)
    }

    /// [`Self::search_subgraphs`] rendered as tool output
    pub async fn search_subgraphs_output(&self, search_query: &str) -> String {
        let result = self.search_subgraphs(search_query).await;
        self.output(result, Operation::SearchSubgraphs)
    }

    fn output(&self, result: Result<String, ToolError>, operation: Operation) -> String {
        result.unwrap_or_else(|error| error.into_tool_output(operation, self.gateway.api_key()))
    }
}
