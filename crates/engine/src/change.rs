//! Change detection
//!
//! Two policies, picked per artifact kind:
//! - documents are rendered in memory, so the candidate bytes are compared
//!   against the destination bytes directly
//! - assets are compared by digest, where an unreadable side never matches

use crate::hash;
use crate::system::System;
use folio_core::path::AbsPath;

/// Whether a rendered document must be written to `dest`
///
/// A missing or unreadable destination always needs a write.
pub fn document_needs_write<S: System>(system: &S, dest: &AbsPath, rendered: &[u8]) -> bool {
    if !system.exists(dest) {
        return true;
    }

    match system.read_file(dest) {
        Ok(existing) => existing != rendered,
        Err(e) => {
            tracing::debug!(path = %dest, error = %e, "Destination unreadable, rewriting");
            true
        }
    }
}

/// Whether the asset at `source` must be copied over `dest`
pub fn asset_needs_write<S: System>(system: &S, source: &AbsPath, dest: &AbsPath) -> bool {
    if !system.exists(dest) {
        return true;
    }

    !hash::digests_match(system.digest(source), system.digest(dest))
}
