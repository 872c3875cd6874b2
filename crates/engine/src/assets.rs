//! Asset propagation
//!
//! Copies the referenced, changed subset of the source asset tree into the
//! backup. Nothing is ever deleted from the destination.

use crate::change;
use crate::system::System;
use folio_config::CategoryPaths;
use folio_core::path::{AbsPath, RelPath};
use std::collections::BTreeSet;
use walkdir::WalkDir;

/// Outcome of one propagation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Assets copied because they were missing or changed
    pub copied: usize,
    /// Assets whose destination already matched
    pub skipped: usize,
    /// Source assets nobody references
    pub orphans: usize,
    /// References without a matching source file
    pub dangling: usize,
    /// Copies that failed
    pub failed: usize,
    /// Destination paths written, relative to the backup root
    pub changed: Vec<String>,
}

/// Copies referenced assets from the source asset root to the destination
pub struct AssetPropagator<'a, S: System> {
    system: &'a S,
    paths: Option<&'a CategoryPaths>,
}

impl<'a, S: System> AssetPropagator<'a, S> {
    /// Create a propagator; `paths` is `None` when no asset category is configured
    pub fn new(system: &'a S, paths: Option<&'a CategoryPaths>) -> Self {
        Self { system, paths }
    }

    /// Copy every referenced asset whose content differs from its destination
    pub fn propagate(&self, references: &BTreeSet<String>) -> AssetReport {
        let mut report = AssetReport::default();

        let Some(paths) = self.paths else {
            if !references.is_empty() {
                tracing::warn!(
                    count = references.len(),
                    "Assets referenced but no asset category is configured"
                );
            }
            return report;
        };

        if !self.system.is_dir(&paths.source) {
            tracing::warn!(path = %paths.source, "Asset directory missing, skipping assets");
            return report;
        }

        report.orphans = self.count_orphans(paths, references);

        for reference in references {
            let Ok(rel) = RelPath::contained(reference) else {
                tracing::warn!(reference = %reference, "Asset reference leaves the asset root");
                report.dangling += 1;
                continue;
            };

            let source = paths.source.join(&rel);
            if !self.system.exists(&source) || self.system.is_dir(&source) {
                tracing::warn!(reference = %reference, "Referenced asset not found");
                report.dangling += 1;
                continue;
            }

            let dest = paths.target.join(&rel);
            if !change::asset_needs_write(self.system, &source, &dest) {
                tracing::debug!(reference = %reference, "Asset unchanged");
                report.skipped += 1;
                continue;
            }

            match self.system.copy_file(&source, &dest) {
                Ok(()) => {
                    tracing::info!(reference = %reference, "Copied asset");
                    report.copied += 1;
                    report.changed.push(paths.target_rel.join(&rel).to_slash_string());
                }
                Err(e) => {
                    tracing::error!(reference = %reference, error = %e, "Failed to copy asset");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Count source assets that no document references
    fn count_orphans(&self, paths: &CategoryPaths, references: &BTreeSet<String>) -> usize {
        let mut orphans = 0;

        for entry in WalkDir::new(paths.source.as_path())
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read asset directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(rel) = AbsPath::new(entry.path().to_path_buf())
                .and_then(|path| path.strip_prefix(&paths.source))
            else {
                continue;
            };

            if !references.contains(&rel.to_slash_string()) {
                tracing::debug!(asset = %rel, "Unreferenced asset");
                orphans += 1;
            }
        }

        orphans
    }
}
