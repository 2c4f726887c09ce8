//! Projection of `subgraphMetadataSearch` results.
//!
//! The network subgraph returns deeply nested, frequently incomplete records.
//! Every link of the chain is modelled as an `Option` so the skip and default
//! rules below are visible in the types rather than scattered null checks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cache::{SchemaCache, SchemaCacheEntry};
use crate::errors::ToolError;

/// Maximum number of description characters kept before truncation
pub const DESCRIPTION_LIMIT: usize = 150;

const DEFAULT_NETWORK: &str = "unknown";
const DEFAULT_SIGNAL: &str = "0";

/// Full-text search over subgraph metadata on the network subgraph.
pub const SEARCH_QUERY: &str = r#"
query SearchSubgraphs($text: String!) {
  subgraphMetadataSearch(text: $text, first: 20) {
    displayName
    description
    subgraph {
      id
      signalledTokens
      currentVersion {
        metadata {
          description
        }
        subgraphDeployment {
          ipfsHash
          manifest {
            network
            schema {
              schema
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    /// Malformed items are kept as `None` so they count as raw hits but never project.
    #[serde(default, deserialize_with = "lenient_items")]
    pub subgraph_metadata_search: Option<Vec<Option<SubgraphMetadata>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphMetadata {
    #[serde(default, deserialize_with = "scalar_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subgraph: Option<Subgraph>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgraph {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub signalled_tokens: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_version: Option<SubgraphVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphVersion {
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<VersionMetadata>,
    #[serde(default, deserialize_with = "lenient")]
    pub subgraph_deployment: Option<SubgraphDeployment>,
}

#[derive(Debug, Deserialize)]
pub struct VersionMetadata {
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphDeployment {
    #[serde(default, deserialize_with = "scalar_string")]
    pub ipfs_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub manifest: Option<Manifest>,
}

impl SubgraphDeployment {
    /// A deployment object with none of its fields set, e.g. `{}`
    fn is_empty(&self) -> bool {
        self.ipfs_hash.is_none() && self.manifest.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub network: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<ManifestSchema>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestSchema {
    #[serde(default, deserialize_with = "scalar_string")]
    pub schema: Option<String>,
}

/// A normalized search hit as returned to the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultEntry {
    pub subgraph_id: String,
    pub display_name: Option<String>,
    pub network: String,
    pub signalled_tokens: String,
    pub deployment_ipfs_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SearchResultEntry {
    /// Sort key: the signal as an integer, with anything non-numeric counted as zero
    fn signal(&self) -> i128 {
        self.signalled_tokens.trim().parse().unwrap_or(0)
    }
}

/// What a search produced
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    NoMatches,
    NoneDeployed,
    Found(Vec<SearchResultEntry>),
}

impl SearchOutcome {
    /// Render the outcome as tool output
    pub fn into_text(self, search_query: &str) -> Result<String, ToolError> {
        match self {
            SearchOutcome::NoMatches => Ok(format!("No subgraphs found matching '{search_query}'")),
            SearchOutcome::NoneDeployed => Ok(format!(
                "Subgraphs were found matching '{search_query}', but none have an active deployment. Try a broader search term."
            )),
            SearchOutcome::Found(entries) => Ok(serde_json::to_string(&entries)?),
        }
    }
}

/// Extract the `data` member of a search response
pub fn search_data(response: &Value) -> Result<SearchData, ToolError> {
    match response.get("data") {
        None | Some(Value::Null) => Ok(SearchData::default()),
        Some(data) => SearchData::deserialize(data)
            .map_err(|e| ToolError::Shape(format!("unexpected search response shape: {e}"))),
    }
}

/// Filter, default, and sort raw search hits.
///
/// Any inline manifest schema is stored in `cache` as the text form for its
/// subgraph, so a later schema request can skip the gateway.
pub fn project(data: SearchData, cache: &SchemaCache) -> SearchOutcome {
    let raw = data.subgraph_metadata_search.unwrap_or_default();
    if raw.is_empty() {
        return SearchOutcome::NoMatches;
    }

    let raw_count = raw.len();
    let mut entries: Vec<SearchResultEntry> = raw
        .into_iter()
        .flatten()
        .filter_map(|metadata| project_one(metadata, cache))
        .collect();
    debug!(raw_count, kept = entries.len(), "Projected search results");

    if entries.is_empty() {
        return SearchOutcome::NoneDeployed;
    }

    // Stable, so ties keep upstream order
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.signal()));
    SearchOutcome::Found(entries)
}

fn project_one(metadata: SubgraphMetadata, cache: &SchemaCache) -> Option<SearchResultEntry> {
    let SubgraphMetadata {
        display_name,
        description,
        subgraph,
    } = metadata;
    let Subgraph {
        id,
        signalled_tokens,
        current_version,
    } = subgraph?;
    let version = current_version?;
    let subgraph_id = id.filter(|id| !id.is_empty())?;
    let deployment = version
        .subgraph_deployment
        .filter(|deployment| !deployment.is_empty())?;

    let (network, schema) = match deployment.manifest {
        Some(manifest) => (
            manifest.network,
            manifest.schema.and_then(|schema| schema.schema),
        ),
        None => (None, None),
    };

    if let Some(schema) = schema.filter(|schema| !schema.is_empty()) {
        cache.put(subgraph_id.clone(), SchemaCacheEntry::text(schema));
    }

    let version_description = version.metadata.and_then(|metadata| metadata.description);
    let description = non_empty(description)
        .or_else(|| non_empty(version_description))
        .map(truncate_description);

    Some(SearchResultEntry {
        subgraph_id,
        display_name,
        network: network.unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
        signalled_tokens: signalled_tokens.unwrap_or_else(|| DEFAULT_SIGNAL.to_string()),
        deployment_ipfs_hash: deployment.ipfs_hash,
        description,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn truncate_description(description: String) -> String {
    match description.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", description.get(..cut).unwrap_or_default()),
        None => description,
    }
}

/// Scalars are carried as strings: BigInt fields arrive as strings or plain
/// numbers. Objects, arrays and nulls count as absent.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A link in the chain that does not have the expected shape counts as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| serde_json::from_value(value).ok()))
}

fn lenient_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(id: &str, signal: Value) -> Value {
        json!({
            "displayName": format!("Subgraph {id}"),
            "description": format!("About {id}"),
            "subgraph": {
                "id": id,
                "signalledTokens": signal,
                "currentVersion": {
                    "metadata": { "description": null },
                    "subgraphDeployment": {
                        "ipfsHash": format!("Qm{id}"),
                        "manifest": { "network": "mainnet", "schema": null }
                    }
                }
            }
        })
    }

    fn run(hits: Value) -> (SearchOutcome, SchemaCache) {
        let cache = SchemaCache::new();
        let data = search_data(&json!({ "data": { "subgraphMetadataSearch": hits } })).unwrap();
        (project(data, &cache), cache)
    }

    fn found(outcome: SearchOutcome) -> Vec<SearchResultEntry> {
        match outcome {
            SearchOutcome::Found(entries) => entries,
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn sorts_by_signal_descending_with_unparseable_as_zero() {
        let mut absent = hit("absent", Value::Null);
        absent["subgraph"].as_object_mut().unwrap().remove("signalledTokens");

        let (outcome, _) = run(json!([
            hit("ten", json!("10")),
            hit("abc", json!("abc")),
            hit("five-hundred", json!("500")),
            absent,
        ]));

        let ids: Vec<_> = found(outcome).into_iter().map(|e| e.subgraph_id).collect();
        assert_eq!(ids, ["five-hundred", "ten", "abc", "absent"]);
    }

    #[test]
    fn negative_signal_sorts_below_non_numeric() {
        let (outcome, _) = run(json!([hit("neg", json!("-5")), hit("abc", json!("abc"))]));

        let ids: Vec<_> = found(outcome).into_iter().map(|e| e.subgraph_id).collect();
        assert_eq!(ids, ["abc", "neg"]);
    }

    #[test]
    fn mistyped_fields_do_not_sink_other_hits() {
        let mut odd = hit("odd", json!("7"));
        odd["displayName"] = json!(42);
        odd["description"] = json!({ "text": "nested" });
        odd["subgraph"]["currentVersion"]["subgraphDeployment"]["ipfsHash"] = json!(["Qm"]);
        odd["subgraph"]["currentVersion"]["subgraphDeployment"]["manifest"]["network"] =
            json!(false);

        let (outcome, _) = run(json!([hit("good", json!("1")), odd, "not an object", null]));

        let entries = found(outcome);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subgraph_id, "odd");
        assert_eq!(entries[0].display_name.as_deref(), Some("42"));
        assert_eq!(entries[0].description, None);
        assert_eq!(entries[0].deployment_ipfs_hash, None);
        assert_eq!(entries[0].network, "false");
        assert_eq!(entries[1].subgraph_id, "good");
    }

    #[test]
    fn mistyped_links_count_as_absent() {
        let mut bad_version = hit("a", json!("1"));
        bad_version["subgraph"]["currentVersion"] = json!("v1");

        let (outcome, _) = run(json!([bad_version, 17]));

        assert_eq!(outcome, SearchOutcome::NoneDeployed);
    }

    #[test]
    fn empty_deployment_is_dropped() {
        let mut empty = hit("empty", json!("1"));
        empty["subgraph"]["currentVersion"]["subgraphDeployment"] = json!({});

        let (outcome, _) = run(json!([empty, hit("kept", json!("1"))]));

        let ids: Vec<_> = found(outcome).into_iter().map(|e| e.subgraph_id).collect();
        assert_eq!(ids, ["kept"]);
    }

    #[test]
    fn absent_signal_defaults_to_zero_string() {
        let (outcome, _) = run(json!([hit("a", Value::Null)]));

        assert_eq!(found(outcome)[0].signalled_tokens, "0");
    }

    #[test]
    fn signal_larger_than_u64_sorts_numerically() {
        let (outcome, _) = run(json!([
            hit("small", json!("99999999999999999999")),
            hit("large", json!("1500000000000000000000000")),
        ]));

        let ids: Vec<_> = found(outcome).into_iter().map(|e| e.subgraph_id).collect();
        assert_eq!(ids, ["large", "small"]);
    }

    #[test]
    fn numeric_signal_is_accepted() {
        let (outcome, _) = run(json!([hit("a", json!(42))]));

        assert_eq!(found(outcome)[0].signalled_tokens, "42");
    }

    #[test]
    fn drops_items_without_a_current_version() {
        let mut no_version = hit("gone", json!("100"));
        no_version["subgraph"]["currentVersion"] = Value::Null;

        let (outcome, _) = run(json!([no_version, hit("kept", json!("1"))]));

        let entries = found(outcome);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subgraph_id, "kept");
    }

    #[test]
    fn drops_items_without_subgraph_id_or_deployment() {
        let mut no_id = hit("x", json!("1"));
        no_id["subgraph"]["id"] = Value::Null;
        let mut no_deployment = hit("y", json!("1"));
        no_deployment["subgraph"]["currentVersion"]["subgraphDeployment"] = Value::Null;
        let no_subgraph = json!({ "displayName": "orphan", "subgraph": null });

        let (outcome, _) = run(json!([no_id, no_deployment, no_subgraph]));

        assert_eq!(outcome, SearchOutcome::NoneDeployed);
    }

    #[test]
    fn missing_manifest_defaults_network() {
        let mut no_manifest = hit("a", json!("1"));
        no_manifest["subgraph"]["currentVersion"]["subgraphDeployment"]["manifest"] = Value::Null;

        let (outcome, _) = run(json!([no_manifest]));

        assert_eq!(found(outcome)[0].network, "unknown");
    }

    #[test]
    fn description_falls_back_to_version_metadata() {
        let mut item = hit("a", json!("1"));
        item["description"] = Value::Null;
        item["subgraph"]["currentVersion"]["metadata"]["description"] = json!("From version");

        let (outcome, _) = run(json!([item]));

        assert_eq!(found(outcome)[0].description.as_deref(), Some("From version"));
    }

    #[test]
    fn missing_description_is_omitted_from_json() {
        let mut item = hit("a", json!("1"));
        item["description"] = Value::Null;

        let (outcome, _) = run(json!([item]));

        insta::assert_snapshot!(outcome.into_text("a").unwrap(), @r#"[{"subgraphId":"a","displayName":"Subgraph a","network":"mainnet","signalledTokens":"1","deploymentIpfsHash":"Qma"}]"#);
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut item = hit("a", json!("1"));
        item["description"] = json!("é".repeat(200));

        let (outcome, _) = run(json!([item]));

        let description = found(outcome)[0].description.clone().unwrap();
        assert_eq!(description, format!("{}...", "é".repeat(150)));
    }

    #[test]
    fn descriptions_at_the_limit_are_kept_whole() {
        let mut item = hit("a", json!("1"));
        item["description"] = json!("x".repeat(150));

        let (outcome, _) = run(json!([item]));

        assert_eq!(found(outcome)[0].description, Some("x".repeat(150)));
    }

    #[test]
    fn inline_schema_prewarms_text_form_only() {
        let mut item = hit("a", json!("1"));
        item["subgraph"]["currentVersion"]["subgraphDeployment"]["manifest"]["schema"] =
            json!({ "schema": "type Token @entity { id: ID! }" });

        let (_, cache) = run(json!([item]));

        assert_eq!(
            cache.get("a"),
            Some(SchemaCacheEntry::text("type Token @entity { id: ID! }"))
        );
    }

    #[test]
    fn no_raw_hits_is_no_matches() {
        let (outcome, _) = run(json!([]));
        assert_eq!(outcome, SearchOutcome::NoMatches);

        let cache = SchemaCache::new();
        let data = search_data(&json!({ "data": null })).unwrap();
        assert_eq!(project(data, &cache), SearchOutcome::NoMatches);
    }

    #[test]
    fn empty_outcomes_have_distinct_messages() {
        assert_eq!(
            SearchOutcome::NoMatches.into_text("uniswap").unwrap(),
            "No subgraphs found matching 'uniswap'"
        );
        assert_eq!(
            SearchOutcome::NoneDeployed.into_text("uniswap").unwrap(),
            "Subgraphs were found matching 'uniswap', but none have an active deployment. Try a broader search term."
        );
    }
}
