//! Sample records as published in a language index

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Every available sample, keyed by language
pub type Samples = BTreeMap<String, Vec<Sample>>;

/// One catalog entry. Unique per `(language, path)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Location of the sample below the base URL
    pub path: String,

    /// Upstream content hash of the sample
    #[serde(default)]
    pub sha: String,

    /// Descriptive metadata
    #[serde(rename = "example", default)]
    pub fields: Fields,
}

/// Metadata nested under `example` in the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fields {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    pub author: String,
    pub date: String,
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dependencies: Vec<String>,
    /// Host OS tags; empty means every OS
    #[serde(deserialize_with = "null_as_default")]
    pub os: Vec<String>,
    #[serde(rename = "sample_readme_uri")]
    pub readme_uri: String,
    #[serde(rename = "targetDevice", deserialize_with = "null_as_default")]
    pub target_device: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub builder: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub toolchain: Vec<String>,
    /// Kept opaque, only passed through
    #[serde(rename = "projectOptions", deserialize_with = "null_as_default")]
    pub project_options: Vec<serde_json::Value>,
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a language index body
pub fn parse_index(bytes: &[u8]) -> serde_json::Result<Vec<Sample>> {
    serde_json::from_slice(bytes)
}
