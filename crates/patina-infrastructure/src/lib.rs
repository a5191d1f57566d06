//! Infrastructure layer for Patina.
//!
//! Filesystem concerns: locating the configuration directory and loading
//! `config.toml`.

pub mod config_service;
pub mod paths;

pub use config_service::ConfigService;
pub use paths::PatinaPaths;
