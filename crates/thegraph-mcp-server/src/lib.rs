#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cache;
pub mod errors;
pub mod gateway;
pub(crate) mod json_schema;
pub mod schema_text;
pub mod search_results;
pub mod server;
pub mod server_info;
pub mod service;
pub(crate) mod tools;
