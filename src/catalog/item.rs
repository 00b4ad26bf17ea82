//! Runtime view of one catalog entry and the operations it supports.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::filter::ExtensionFilter;
use super::record::ItemRecord;
use crate::fs_ops::{
    self, BatchReport, Capture, EntryKind, Executor, StepOutcome, create_links, delete_links,
    stored_files,
};

/// A record bound to the catalog folder it lives in.
#[derive(Debug, Clone)]
pub struct Item {
    record: ItemRecord,
    catalog_dir: PathBuf,
}

impl Item {
    pub fn new(record: ItemRecord, catalog_dir: impl Into<PathBuf>) -> Self {
        Self {
            record,
            catalog_dir: catalog_dir.into(),
        }
    }

    pub fn record(&self) -> &ItemRecord {
        &self.record
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn is_file(&self) -> bool {
        self.record.is_file
    }

    pub fn filter(&self) -> ExtensionFilter {
        self.record.extension_filter.clone().unwrap_or_default()
    }

    /// Storage subtree as the catalog sees it: `<catalog-folder>/<id>`.
    pub fn storage_path(&self) -> PathBuf {
        self.catalog_dir.join(&self.record.id)
    }

    /// Storage subtree as links see it: `<alias>/<id>`.
    pub fn storage_alias_path(&self) -> PathBuf {
        Path::new(&self.record.storage_root_alias).join(&self.record.id)
    }

    /// Directory the mirrored tree is rooted at; a file record links next to itself.
    pub fn link_root(&self) -> PathBuf {
        let target = &self.record.link_target_path;
        if self.record.is_file {
            target
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| target.clone())
        } else {
            target.clone()
        }
    }

    /// Copy the original files into the storage subtree.
    pub fn capture(&self, exec: &mut Executor) -> Capture {
        fs_ops::capture(
            &self.record.original_path,
            &self.storage_path(),
            &self.filter(),
            exec,
        )
    }

    /// Copy stored files back to the original location.
    pub fn restore(&self, force: bool, exec: &mut Executor) -> Result<BatchReport> {
        info!(id = %self.id(), dest = %self.record.original_path.display(), "restoring item");
        fs_ops::restore(
            &self.storage_alias_path(),
            &self.record.original_path,
            self.record.is_file,
            &self.filter(),
            force,
            exec,
        )
    }

    /// Link every given stored file (relative to storage) into place.
    pub fn create_links_for(
        &self,
        files: &[PathBuf],
        alias_override: Option<&str>,
        force: bool,
        exec: &mut Executor,
    ) -> BatchReport {
        let target_root = match alias_override {
            Some(alias) => Path::new(alias).join(&self.record.id),
            None => self.storage_alias_path(),
        };
        let link_root = self.link_root();
        let pairs = files
            .iter()
            .map(|rel| (link_root.join(rel), target_root.join(rel)));
        create_links(pairs, force, exec)
    }

    /// Walk the storage subtree and (re)create the link for every stored file.
    pub fn create_all_links(
        &self,
        alias_override: Option<&str>,
        force: bool,
        exec: &mut Executor,
    ) -> Result<BatchReport> {
        let files = stored_files(&self.storage_path())?;
        Ok(self.create_links_for(&files, alias_override, force, exec))
    }

    /// Remove the links this item created. Real files are never deleted.
    pub fn delete_created_links(&self, exec: &mut Executor) -> Result<BatchReport> {
        if self.record.is_file {
            return Ok(delete_links([self.record.link_target_path.clone()], exec));
        }
        let files = stored_files(&self.storage_alias_path())?;
        let root = self.link_root();
        Ok(delete_links(files.iter().map(|rel| root.join(rel)), exec))
    }

    /// Delete the captured originals (given relative to storage) so links can take their place.
    /// Symlinks found at those paths are left alone.
    pub fn delete_original_files(&self, files: &[PathBuf], exec: &mut Executor) -> BatchReport {
        let original = &self.record.original_path;
        let paths: Vec<PathBuf> = if self.record.is_file {
            vec![original.clone()]
        } else {
            files.iter().map(|rel| original.join(rel)).collect()
        };

        let mut report = BatchReport::new();
        for path in paths {
            let outcome = match exec.probe(&path) {
                Ok(EntryKind::File) => match exec.remove_file(&path) {
                    Ok(()) => StepOutcome::Done,
                    Err(e) => StepOutcome::Failed(e.to_string()),
                },
                Ok(EntryKind::Missing) => StepOutcome::Skipped("missing".into()),
                Ok(_) => StepOutcome::Skipped("not a regular file".into()),
                Err(e) => StepOutcome::Failed(e.to_string()),
            };
            if let StepOutcome::Failed(e) = &outcome {
                warn!(path = %path.display(), error = %e, "cannot remove original");
            }
            report.record(path, outcome);
        }
        report
    }

    /// Remove the whole storage subtree.
    pub fn delete_from_storage(&self, exec: &mut Executor) -> Result<()> {
        exec.remove_tree(&self.storage_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_file: bool) -> ItemRecord {
        ItemRecord {
            name: "cfg".into(),
            id: "20240101000000000000_cfg".into(),
            is_file,
            original_path: "/etc/app/cfg".into(),
            storage_root_alias: "$STORE".into(),
            link_target_path: "/etc/app/cfg".into(),
            extension_filter: None,
        }
    }

    #[test]
    fn paths_derive_from_id() {
        let item = Item::new(record(false), "/srv/catalog");
        assert_eq!(item.storage_path(), PathBuf::from("/srv/catalog/20240101000000000000_cfg"));
        assert_eq!(item.storage_alias_path(), PathBuf::from("$STORE/20240101000000000000_cfg"));
        assert_eq!(item.link_root(), PathBuf::from("/etc/app/cfg"));
    }

    #[test]
    fn file_record_links_next_to_itself() {
        let item = Item::new(record(true), "/srv/catalog");
        assert_eq!(item.link_root(), PathBuf::from("/etc/app"));
    }

    #[test]
    fn dry_run_link_plan_uses_alias_override() {
        let item = Item::new(record(false), "/srv/catalog");
        let mut exec = Executor::new(true);
        item.create_links_for(&[PathBuf::from("a.ini")], Some("//nas/share"), true, &mut exec);
        let planned = exec.actions().iter().find_map(|a| match a {
            fs_ops::Action::Symlink { target, .. } => Some(target.clone()),
            _ => None,
        });
        assert_eq!(
            planned,
            Some(PathBuf::from("//nas/share/20240101000000000000_cfg/a.ini"))
        );
    }
}
