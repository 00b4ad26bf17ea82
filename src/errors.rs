//! Typed error definitions for take_over.
//! Provides a small set of well-known failure modes for better logs, exit codes and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TakeOverError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog file does not exist: {0}")]
    CatalogMissing(PathBuf),

    #[error("Catalog {path} is corrupted: {reason}")]
    CatalogCorrupt { path: PathBuf, reason: String },

    #[error("Catalog entry '{id}' is malformed: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog is not loaded; refusing to touch {0}")]
    CatalogNotLoaded(PathBuf),

    #[error("Cannot {op} catalog file {path}: {source}")]
    CatalogIo {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Item '{0}' not found in catalog")]
    NotFound(String),

    #[error("Item name '{token}' is ambiguous; matches: {}", candidates.join(", "))]
    Ambiguous { token: String, candidates: Vec<String> },

    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("Refusing to take over symlink: {0}")]
    SourceIsSymlink(PathBuf),

    #[error("Cannot take over {path}: it overlaps the catalog folder {catalog}")]
    OverlapsCatalog { path: PathBuf, catalog: PathBuf },

    #[error("Item id '{0}' is already in use")]
    IdCollision(String),

    #[error("Nothing was captured from {0}")]
    NothingCaptured(PathBuf),

    #[error("{op} finished with {failed} failed entr{}", if *failed == 1 { "y" } else { "ies" })]
    PartialFailure { op: &'static str, failed: usize },

    #[error("'{0}' is not implemented")]
    NotImplemented(&'static str),
}

impl TakeOverError {
    /// Stable process exit code per failure class.
    pub fn code(&self) -> u8 {
        match self {
            TakeOverError::InvalidConfig(_) | TakeOverError::CatalogMissing(_) => 2,
            TakeOverError::CatalogCorrupt { .. }
            | TakeOverError::InvalidRecord { .. }
            | TakeOverError::CatalogNotLoaded(_) => 3,
            TakeOverError::NotFound(_) | TakeOverError::Ambiguous { .. } => 4,
            TakeOverError::SourceNotFound(_)
            | TakeOverError::SourceIsSymlink(_)
            | TakeOverError::OverlapsCatalog { .. }
            | TakeOverError::IdCollision(_)
            | TakeOverError::NothingCaptured(_)
            | TakeOverError::PartialFailure { .. } => 5,
            TakeOverError::CatalogIo { .. } => 6,
            TakeOverError::NotImplemented(_) => 7,
        }
    }

    /// Short machine-friendly tag used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TakeOverError::InvalidConfig(_) => "invalid_config",
            TakeOverError::CatalogMissing(_) => "catalog_missing",
            TakeOverError::CatalogCorrupt { .. } => "catalog_corrupt",
            TakeOverError::InvalidRecord { .. } => "invalid_record",
            TakeOverError::CatalogNotLoaded(_) => "catalog_not_loaded",
            TakeOverError::CatalogIo { .. } => "catalog_io",
            TakeOverError::NotFound(_) => "not_found",
            TakeOverError::Ambiguous { .. } => "ambiguous",
            TakeOverError::SourceNotFound(_) => "source_not_found",
            TakeOverError::SourceIsSymlink(_) => "source_is_symlink",
            TakeOverError::OverlapsCatalog { .. } => "overlaps_catalog",
            TakeOverError::IdCollision(_) => "id_collision",
            TakeOverError::NothingCaptured(_) => "nothing_captured",
            TakeOverError::PartialFailure { .. } => "partial_failure",
            TakeOverError::NotImplemented(_) => "not_implemented",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_group_by_failure_class() {
        assert_eq!(TakeOverError::InvalidConfig("bad".into()).code(), 2);
        assert_eq!(TakeOverError::CatalogMissing(PathBuf::from("x")).code(), 2);
        assert_eq!(TakeOverError::NotFound("a".into()).code(), 4);
        let amb = TakeOverError::Ambiguous {
            token: "cfg".into(),
            candidates: vec!["1_cfg".into(), "2_cfg".into()],
        };
        assert_eq!(amb.code(), 4);
        assert!(amb.to_string().contains("1_cfg, 2_cfg"));
        assert_eq!(TakeOverError::NotImplemented("update").code(), 7);
        let overlap = TakeOverError::OverlapsCatalog {
            path: PathBuf::from("/home"),
            catalog: PathBuf::from("/home/db"),
        };
        assert_eq!(overlap.code(), 5);
        assert_eq!(overlap.kind(), "overlaps_catalog");
    }

    #[test]
    fn partial_failure_message_pluralizes() {
        let one = TakeOverError::PartialFailure { op: "restore", failed: 1 };
        let many = TakeOverError::PartialFailure { op: "restore", failed: 3 };
        assert_eq!(one.to_string(), "restore finished with 1 failed entry");
        assert_eq!(many.to_string(), "restore finished with 3 failed entries");
    }
}
