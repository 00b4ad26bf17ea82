//! Filesystem operations: modularized.
//!
//! - exec: every mutation, dry-run aware
//! - copy: capture into storage / restore from storage
//! - link: create / remove mirror links
//! - report: per-entry outcomes of a walk

mod copy;
mod exec;
mod helpers;
mod link;
mod report;

pub use copy::{Capture, capture, restore};
pub use exec::{Action, EntryKind, Executor};
pub use helpers::io_error_with_help;
pub use link::{create_link, create_links, delete_link, delete_links, stored_files};
pub use report::{BatchReport, StepOutcome};
