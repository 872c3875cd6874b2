//! # Folio Engine
//!
//! Incremental transform-and-sync engine behind the folio CLI.
//!
//! - **Transform**: header stripping, title extraction and link rewriting
//! - **Change detection**: byte comparison for documents, blake3 digests for assets
//! - **Assets**: copies only the referenced, changed subset of the asset tree
//! - **Manifest**: per-category, per-year index of every backed-up document
//! - **Sync**: one full pass tying the above together
//! - **System Abstraction**: Filesystem operations abstracted for testing and dry runs

pub mod assets;
pub mod change;
pub mod hash;
pub mod manifest;
pub mod record;
pub mod sync;
pub mod system;
pub mod transform;

// Re-export path types from core
pub use folio_core::path::{AbsPath, RelPath};

// Re-export error types from core
pub use folio_core::{Error, Result};

// Re-export commonly used types
pub use assets::{AssetPropagator, AssetReport};
pub use manifest::build_manifest;
pub use record::DocumentRecord;
pub use sync::{CategoryReport, ManifestStatus, SyncOrchestrator, SyncReport};
pub use system::{DryRunSystem, RealSystem, System};
pub use transform::{DocumentTransformer, Transformed};
