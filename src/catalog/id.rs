//! Item identifiers: `<compact-timestamp>_<name>`.
//!
//! The timestamp is rendered down to microseconds and stripped of `-`, `:`, `.`
//! and spaces, so ids sort chronologically and are safe as directory names.
//! Two take-overs of the same name inside one microsecond produce the same id;
//! callers must check for collisions before using a fresh id.

use chrono::{Local, NaiveDateTime};

/// Separator between the timestamp prefix and the item name.
pub const ID_SEPARATOR: char = '_';

/// Build an id from an explicit timestamp and base name.
pub fn generate_id(at: NaiveDateTime, name: &str) -> String {
    let stamp = at.format("%Y-%m-%d %H:%M:%S%.6f").to_string();
    let compact: String = stamp
        .chars()
        .filter(|c| !matches!(c, '-' | ':' | '.' | ' '))
        .collect();
    format!("{compact}{ID_SEPARATOR}{name}")
}

/// Build an id for `name` stamped with the current local time.
pub fn new_id(name: &str) -> String {
    generate_id(Local::now().naive_local(), name)
}

/// The part of an id after the timestamp prefix, if the id has one.
pub fn id_suffix(id: &str) -> Option<&str> {
    id.split_once(ID_SEPARATOR).map(|(_, suffix)| suffix)
}
