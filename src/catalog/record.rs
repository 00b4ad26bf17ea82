//! One catalog entry as stored in the catalog file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::filter::ExtensionFilter;

/// Persisted description of a managed item.
///
/// JSON keys keep the historical catalog layout:
/// `{"name", "database id", "is file", "original path", "default database path", "symlink path"}`
/// plus an optional `"extensions"` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Base name of the original path at take-over time (not unique).
    pub name: String,
    #[serde(rename = "database id")]
    pub id: String,
    #[serde(rename = "is file")]
    pub is_file: bool,
    #[serde(rename = "original path")]
    pub original_path: PathBuf,
    /// Root embedded in link targets; never expanded or resolved.
    #[serde(rename = "default database path")]
    pub storage_root_alias: String,
    #[serde(rename = "symlink path")]
    pub link_target_path: PathBuf,
    #[serde(
        rename = "extensions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extension_filter: Option<ExtensionFilter>,
}
