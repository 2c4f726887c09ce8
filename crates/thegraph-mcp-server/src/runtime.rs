//! Runtime utilities
//!
//! This module is only used by the main binary and provides helper code
//! related to runtime configuration.

mod config;
pub mod logging;

use std::path::Path;

pub use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// The conventional variable holding The Graph API key, honored without the server prefix
const API_KEY_ENV: &str = "THEGRAPH_API_KEY";

/// Read the config from the environment, layered over an optional YAML file.
///
/// Environment variables take precedence over the file.
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: Option<&Path>) -> Result<Config, figment::Error> {
    let figment = Figment::new()
        .join(Env::raw().only(&[API_KEY_ENV]).map(|_| "api_key".into()))
        .join(Env::prefixed("THEGRAPH_MCP_").split(ENV_NESTED_SEPARATOR));

    let figment = match yaml_path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                figment::Error::from(format!(
                    "failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            figment.join(Yaml::string(&content))
        }
        None => figment,
    };

    figment.extract()
}
