//! Core library for `take_over`.
//!
//! Moves files or folders into a catalog folder and puts symlinks where they
//! used to be. The catalog (`takeover_db.json`) records every managed item so
//! links can be recreated, removed, or the files restored later.
//!
//! Layout:
//! - `catalog`: records, ids, name lookup and the JSON store
//! - `fs_ops`: copy and link engines on top of a dry-run aware executor
//! - `workflows`: the user-level operations (take over, restore, links, remove, list)
//! - `config`, `platform`, `errors`, `output`, `cli`: the ambient pieces

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod workflows;

pub use catalog::{CATALOG_FILE_NAME, Catalog, CreateOutcome, ExtensionFilter, Item, ItemRecord};
pub use config::{
    CONFIG_ENV, Config, LogLevel, default_config_path, load_config, load_config_from_xml_path,
    path_has_symlink_ancestor,
};
pub use errors::TakeOverError;
pub use fs_ops::{Action, BatchReport, Executor, StepOutcome};

/// Common imports for callers driving the workflows directly.
pub mod prelude {
    pub use crate::catalog::{Catalog, ExtensionFilter, Item, ItemRecord};
    pub use crate::errors::TakeOverError;
    pub use crate::fs_ops::{Action, BatchReport, Executor, StepOutcome};
    pub use crate::workflows::{
        ListStyle, RestoreOptions, TakeOverRequest, list, remove_source, restore_source,
        set_links, take_over, unset_links,
    };
}
