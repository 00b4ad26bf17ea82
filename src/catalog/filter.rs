//! Extension filter applied when capturing and restoring files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::platform::os_case;

/// Set of file suffixes (`.ini`, `.xml`, ...). Empty means "all files".
///
/// Entries are normalized to a single leading `.` and folded to lower case on
/// platforms with case-insensitive paths, so `xml`, `.xml` and `..xml` are the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionFilter {
    suffixes: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .filter_map(|e| {
                let bare = e.as_ref().trim().trim_start_matches('.');
                (!bare.is_empty()).then(|| os_case(&format!(".{bare}")))
            })
            .collect();
        Self { suffixes }
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    /// True if `path` should be handled: always for an empty filter, otherwise
    /// only when its last extension is listed.
    pub fn matches(&self, path: &Path) -> bool {
        if self.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.suffixes.contains(&os_case(&format!(".{ext}"))),
            None => false,
        }
    }
}

impl From<Vec<String>> for ExtensionFilter {
    fn from(v: Vec<String>) -> Self {
        Self::new(v)
    }
}

impl From<ExtensionFilter> for Vec<String> {
    fn from(f: ExtensionFilter) -> Self {
        f.suffixes.into_iter().collect()
    }
}
