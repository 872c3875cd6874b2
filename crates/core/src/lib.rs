//! Core types and utilities for folio
//!
//! This is the foundation crate (Layer 0) that all other folio crates depend on.
//! It provides:
//! - Path types (AbsPath, RelPath)
//! - Base error types
//!
//! This crate has no dependencies on other folio crates.

pub mod error;
pub mod path;

pub use error::{Error, Result};
