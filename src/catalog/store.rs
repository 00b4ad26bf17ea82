//! Catalog store: the JSON mapping of item id to record, loaded once per
//! invocation and written back atomically.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::item::Item;
use super::record::ItemRecord;
use super::resolve::resolve_id;
use crate::errors::TakeOverError;
use crate::fs_ops::Executor;
use crate::platform;

pub const CATALOG_FILE_NAME: &str = "takeover_db.json";

/// Result of [`Catalog::create`]. An existing catalog is not an error by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Handle to one catalog folder.
///
/// Entries stay `None` until a successful [`Catalog::load`]; a failed load
/// never leaves a half-populated map behind.
#[derive(Debug)]
pub struct Catalog {
    dir: PathBuf,
    file: PathBuf,
    entries: Option<BTreeMap<String, ItemRecord>>,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let file = dir.join(CATALOG_FILE_NAME);
        Self {
            dir,
            file,
            entries: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write an empty catalog (`{}`) unless one is already there.
    pub fn create(&self) -> Result<CreateOutcome, TakeOverError> {
        let res = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.file)
            .and_then(|mut f| {
                f.write_all(b"{}")?;
                f.sync_all()
            });
        match res {
            Ok(()) => {
                info!(path = %self.file.display(), "created catalog");
                Ok(CreateOutcome::Created)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %self.file.display(), "catalog already exists");
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(source) => Err(TakeOverError::CatalogIo {
                op: "create",
                path: self.file.clone(),
                source,
            }),
        }
    }

    /// Read and validate the catalog file. Cached after the first success.
    pub fn load(&mut self) -> Result<(), TakeOverError> {
        if self.entries.is_some() {
            return Ok(());
        }
        let text = match fs::read_to_string(&self.file) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TakeOverError::CatalogMissing(self.file.clone()));
            }
            Err(source) => {
                return Err(TakeOverError::CatalogIo {
                    op: "read",
                    path: self.file.clone(),
                    source,
                });
            }
        };
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| TakeOverError::CatalogCorrupt {
                path: self.file.clone(),
                reason: e.to_string(),
            })?;
        let serde_json::Value::Object(map) = value else {
            return Err(TakeOverError::CatalogCorrupt {
                path: self.file.clone(),
                reason: "top-level value is not an object".into(),
            });
        };

        let mut entries = BTreeMap::new();
        for (id, raw) in map {
            let record: ItemRecord = serde_json::from_value(raw)
                .map_err(|source| TakeOverError::InvalidRecord { id: id.clone(), source })?;
            if record.id != id {
                warn!(key = %id, id = %record.id, "catalog key and record id differ");
            }
            entries.insert(id, record);
        }
        debug!(path = %self.file.display(), count = entries.len(), "loaded catalog");
        self.entries = Some(entries);
        Ok(())
    }

    /// Load, or start from an empty catalog when none exists yet.
    ///
    /// A real run creates the file first; a dry run keeps the empty map in
    /// memory only.
    pub fn create_or_load(&mut self, dry_run: bool) -> Result<(), TakeOverError> {
        if self.entries.is_some() {
            return Ok(());
        }
        if dry_run {
            match self.load() {
                Err(TakeOverError::CatalogMissing(path)) => {
                    info!(path = %path.display(), "dry-run: catalog missing, using an empty one");
                    self.entries = Some(BTreeMap::new());
                    Ok(())
                }
                other => other,
            }
        } else {
            self.create()?;
            self.load()
        }
    }

    /// Serialize the loaded catalog and atomically replace the file.
    pub fn save(&self) -> Result<(), TakeOverError> {
        let Some(entries) = &self.entries else {
            error!(path = %self.file.display(), "refusing to save a catalog that was never loaded");
            return Err(TakeOverError::CatalogNotLoaded(self.file.clone()));
        };
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| TakeOverError::CatalogIo {
            op: "serialize",
            path: self.file.clone(),
            source: io::Error::other(e),
        })?;
        platform::atomic_replace(&self.file, &bytes).map_err(|e| TakeOverError::CatalogIo {
            op: "write",
            path: self.file.clone(),
            source: io::Error::other(e),
        })?;
        debug!(path = %self.file.display(), count = entries.len(), "saved catalog");
        Ok(())
    }

    fn entries(&self) -> Result<&BTreeMap<String, ItemRecord>, TakeOverError> {
        self.entries
            .as_ref()
            .ok_or_else(|| TakeOverError::CatalogNotLoaded(self.file.clone()))
    }

    fn entries_mut(&mut self) -> Result<&mut BTreeMap<String, ItemRecord>, TakeOverError> {
        self.entries
            .as_mut()
            .ok_or_else(|| TakeOverError::CatalogNotLoaded(self.file.clone()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.as_ref().is_some_and(|e| e.contains_key(id))
    }

    pub fn get(&self, id: &str) -> Option<Item> {
        let record = self.entries.as_ref()?.get(id)?;
        Some(Item::new(record.clone(), &self.dir))
    }

    /// Add a record in memory. Call [`Catalog::save`] to persist it.
    pub fn insert(&mut self, record: ItemRecord) -> Result<(), TakeOverError> {
        let entries = self.entries_mut()?;
        if entries.contains_key(&record.id) {
            return Err(TakeOverError::IdCollision(record.id));
        }
        entries.insert(record.id.clone(), record);
        Ok(())
    }

    /// Drop a record from memory without touching storage.
    pub fn forget(&mut self, id: &str) -> Option<ItemRecord> {
        self.entries.as_mut()?.remove(id)
    }

    /// Resolve a user-supplied name (full id or the name part of one).
    pub fn find(&self, token: &str) -> Result<Item, TakeOverError> {
        let entries = self.entries()?;
        match resolve_id(entries, token) {
            Ok(id) => Ok(Item::new(entries[id].clone(), &self.dir)),
            Err(e) => {
                error!(token, error = %e, "name lookup failed");
                Err(e)
            }
        }
    }

    /// Every record, in id order. Empty when nothing is loaded.
    pub fn all(&self) -> impl Iterator<Item = Item> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.values())
            .map(|r| Item::new(r.clone(), &self.dir))
    }

    /// Delete the storage subtree, then the entry, then persist.
    ///
    /// When the subtree exists but cannot be deleted the entry stays so the
    /// stored files remain reachable.
    pub fn remove(&mut self, id: &str, exec: &mut Executor) -> Result<()> {
        let item = self
            .get(id)
            .ok_or_else(|| TakeOverError::NotFound(id.to_string()))?;
        let storage = item.storage_path();

        if exec.probe(&storage)?.is_dir_like() {
            if let Err(e) = item.delete_from_storage(exec) {
                error!(id, path = %storage.display(), error = %e, "cannot delete item storage; entry kept");
                return Err(e);
            }
        } else {
            warn!(id, path = %storage.display(), "item storage is already gone");
        }

        if exec.is_dry_run() {
            info!(id, "dry-run: catalog entry would be removed");
            return Ok(());
        }
        self.forget(id);
        self.save()?;
        info!(id, "removed catalog entry");
        Ok(())
    }
}
