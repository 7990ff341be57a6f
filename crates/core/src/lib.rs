//! Climate API shared library
//!
//! Utilities shared across the service:
//! - Configuration loading (XDG-compliant)
//! - File system helpers

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::path_exists;

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 9600;

/// Default path of the pre-populated observation database
pub const DEFAULT_DATABASE_PATH: &str = "./resources/hawaii.sqlite";
