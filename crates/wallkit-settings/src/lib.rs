//! WallKit Settings Crate
//!
//! Handles wall configuration documents: loading and saving them as JSON or
//! TOML, validating them, and turning them into layout engine input.

pub mod config;
pub mod error;

pub use config::{
    config_dir, default_config_path, ExportSettings, WallConfig, WallSettings, CONFIG_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
