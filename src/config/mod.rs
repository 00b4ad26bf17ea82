//! Config module.
//! Provides configuration types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "TAKE_OVER_CONFIG";
