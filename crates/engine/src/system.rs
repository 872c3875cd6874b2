//! System abstraction for filesystem operations
//!
//! This module provides a trait-based abstraction over filesystem operations,
//! enabling testing and dry-run mode.

use crate::hash::{self, Digest};
use folio_core::path::AbsPath;
use folio_core::{Error, Result};
use std::cell::RefCell;
use std::fs;

/// Abstraction over filesystem operations
///
/// This trait allows us to implement different backends:
/// - `RealSystem`: Actual filesystem operations
/// - `DryRunSystem`: Reads from disk, records mutations without executing them
/// - Failure-injecting implementations for testing
pub trait System {
    /// Read a file's contents
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>>;

    /// Write a file's contents, creating parent directories as needed
    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()>;

    /// Copy a file, creating parent directories of the destination as needed
    fn copy_file(&self, from: &AbsPath, to: &AbsPath) -> Result<()>;

    /// Create a directory and all its parents
    fn create_dir_all(&self, path: &AbsPath) -> Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &AbsPath) -> bool;

    /// Check if a path is an existing directory
    fn is_dir(&self, path: &AbsPath) -> bool;

    /// Best-effort content digest; `None` when the file cannot be read
    fn digest(&self, path: &AbsPath) -> Option<Digest> {
        hash::digest_or_empty(path.as_path())
    }
}

/// Real filesystem implementation
///
/// This implementation performs actual filesystem operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    fn ensure_parent(&self, path: &AbsPath) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(&parent)?;
        }
        Ok(())
    }
}

impl System for RealSystem {
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>> {
        fs::read(path.as_path()).map_err(|e| Error::FileRead {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        self.ensure_parent(path)?;

        fs::write(path.as_path(), content).map_err(|e| Error::FileWrite {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    fn copy_file(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        self.ensure_parent(to)?;

        fs::copy(from.as_path(), to.as_path())
            .map(|_| ())
            .map_err(|e| Error::FileCopy {
                from: from.as_path().to_path_buf(),
                to: to.as_path().to_path_buf(),
                source: e,
            })
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        fs::create_dir_all(path.as_path()).map_err(|e| Error::DirectoryCreate {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    fn exists(&self, path: &AbsPath) -> bool {
        path.as_path().exists()
    }

    fn is_dir(&self, path: &AbsPath) -> bool {
        path.as_path().is_dir()
    }
}

/// Dry-run system that records mutations without executing them
///
/// Reads go to the real filesystem so change detection sees the actual
/// destination state; writes, copies and directory creation are only recorded.
#[derive(Debug, Default)]
pub struct DryRunSystem {
    operations: RefCell<Vec<Operation>>,
}

/// A mutation that would be performed on the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Write a file
    WriteFile { path: AbsPath, size: usize },
    /// Copy a file
    CopyFile { from: AbsPath, to: AbsPath },
    /// Create a directory
    CreateDir { path: AbsPath },
}

impl DryRunSystem {
    /// Create a new dry-run system
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the list of operations that would be performed
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.borrow().clone()
    }

    /// Record an operation
    fn record(&self, op: Operation) {
        self.operations.borrow_mut().push(op);
    }
}

impl System for DryRunSystem {
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>> {
        RealSystem.read_file(path)
    }

    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        self.record(Operation::WriteFile {
            path: path.clone(),
            size: content.len(),
        });
        Ok(())
    }

    fn copy_file(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        self.record(Operation::CopyFile {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        self.record(Operation::CreateDir { path: path.clone() });
        Ok(())
    }

    fn exists(&self, path: &AbsPath) -> bool {
        RealSystem.exists(path)
    }

    fn is_dir(&self, path: &AbsPath) -> bool {
        RealSystem.is_dir(path)
    }
}
