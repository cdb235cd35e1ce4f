//! Configuration for the particle field
//!
//! Provides types and parsing for `particles.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config_toml, find_config, find_config_from, load_config, merge_cli_overrides,
    parse_config, CliOverrides, ConfigError, CONFIG_FILE_NAME,
};
pub use schema::*;
