//! Configuration management for folio
//!
//! This crate handles:
//! - Configuration loading and validation
//! - Resolution of category directories into absolute paths
//! - Logging initialization

pub mod config;
pub mod layout;
pub mod logging;

// Re-export error types from core
pub use folio_core::{Error, Result};

// Re-export main types
pub use config::{
    CategoryDisplay, Config, DateFormat, FilterConfig, ImageConfig, ImageCorrections,
    LoggingConfig, ManifestConfig, PathCorrectionsConfig, PathsConfig,
};
pub use layout::{CategoryPaths, Layout};
