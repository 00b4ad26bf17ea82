//! The catalog: persisted records of every taken-over item plus their storage subtrees.

mod filter;
mod id;
mod item;
mod record;
mod resolve;
mod store;

pub use filter::ExtensionFilter;
pub use id::{ID_SEPARATOR, generate_id, id_suffix, new_id};
pub use item::Item;
pub use record::ItemRecord;
pub use resolve::resolve_id;
pub use store::{CATALOG_FILE_NAME, Catalog, CreateOutcome};
