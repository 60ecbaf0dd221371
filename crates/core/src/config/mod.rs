//! Configuration: the TOML config file, plus what Obsidian itself records
//! about vaults.

pub mod loader;
pub mod obsidian;
pub mod types;
pub mod writer;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{LoggingConfig, ResolvedConfig, VaultSource};
