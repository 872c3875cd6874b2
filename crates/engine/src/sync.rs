//! Sync orchestration
//!
//! One pass over the source tree:
//! 1. Check that the source root exists
//! 2. Create the backup root and every destination category root
//! 3. Transform and write changed documents, collecting asset references
//! 4. Copy referenced assets that changed
//! 5. Render the manifest and write it when it changed
//!
//! Everything a pass accumulates lives in a run-scoped state value that is
//! turned into the [`SyncReport`] at the end, so an orchestrator can be run
//! any number of times.

use crate::assets::{AssetPropagator, AssetReport};
use crate::change;
use crate::manifest::{self, Buckets};
use crate::record::DocumentRecord;
use crate::system::System;
use crate::transform::DocumentTransformer;
use folio_config::{CategoryPaths, Config, Layout};
use folio_core::path::{AbsPath, RelPath};
use folio_core::{Error, Result};
use std::collections::BTreeSet;
use walkdir::WalkDir;

/// Per-category document counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReport {
    /// Category identifier
    pub key: String,
    /// Documents written because they were new or changed
    pub updated: usize,
    /// Documents whose destination already matched
    pub skipped: usize,
    /// Documents on the ignore list
    pub ignored: usize,
    /// Documents that could not be read or written
    pub failed: usize,
    /// The source directory did not exist
    pub missing: bool,
}

/// What happened to the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStatus {
    /// Written because it was new or changed
    Written,
    /// Already up to date
    Unchanged,
    /// Writing failed
    Failed,
}

/// Result of one sync pass
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Document counts in processing order
    pub categories: Vec<CategoryReport>,
    /// Asset counts
    pub assets: AssetReport,
    /// Distinct asset references found across all documents
    pub referenced_assets: usize,
    /// Manifest outcome
    pub manifest: ManifestStatus,
    /// Paths written or copied, relative to the backup root, in write order
    pub changes: Vec<String>,
}

impl SyncReport {
    /// Documents written across all categories
    pub fn documents_updated(&self) -> usize {
        self.categories.iter().map(|c| c.updated).sum()
    }

    /// Documents left untouched across all categories
    pub fn documents_skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped).sum()
    }

    /// Per-item failures of any kind
    pub fn failures(&self) -> usize {
        let documents: usize = self.categories.iter().map(|c| c.failed).sum();
        let manifest = usize::from(self.manifest == ManifestStatus::Failed);
        documents + self.assets.failed + manifest
    }

    /// Whether the pass wrote nothing
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Accumulators for one pass
#[derive(Debug, Default)]
struct RunState {
    buckets: Buckets,
    assets: BTreeSet<String>,
    changes: Vec<String>,
    categories: Vec<CategoryReport>,
}

impl RunState {
    /// Every category the manifest shows starts with an empty bucket
    fn new(config: &Config) -> Self {
        let mut buckets = Buckets::new();
        for key in config
            .manifest
            .categories
            .keys()
            .map(String::as_str)
            .chain(config.document_categories())
        {
            buckets.entry(key.to_string()).or_default();
        }

        Self {
            buckets,
            ..Self::default()
        }
    }

    fn into_report(self, assets: AssetReport, manifest: ManifestStatus) -> SyncReport {
        SyncReport {
            categories: self.categories,
            assets,
            referenced_assets: self.assets.len(),
            manifest,
            changes: self.changes,
        }
    }
}

/// Runs sync passes against one configuration
pub struct SyncOrchestrator<'a, S: System> {
    system: &'a S,
    config: &'a Config,
    layout: Layout,
    transformer: DocumentTransformer,
    manifest_path: AbsPath,
}

impl<'a, S: System> SyncOrchestrator<'a, S> {
    /// Resolve the layout and compile the transformer
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the layout cannot be resolved or a rewrite
    /// rule does not compile.
    pub fn new(system: &'a S, config: &'a Config) -> Result<Self> {
        let layout = Layout::from_config(config)?;
        let manifest_path = layout.manifest_path(config)?;
        let transformer = DocumentTransformer::new(config)?;

        Ok(Self {
            system,
            config,
            layout,
            transformer,
            manifest_path,
        })
    }

    /// Run one full pass
    ///
    /// Per-document and per-asset failures are counted in the report; only a
    /// missing source root or an uncreatable backup root aborts the pass.
    ///
    /// # Errors
    ///
    /// Returns `SourceRootMissing` if the source root is not a directory, or
    /// `DirectoryCreate` if a destination root cannot be created.
    pub fn run(&self) -> Result<SyncReport> {
        if !self.system.is_dir(&self.layout.source_root) {
            return Err(Error::SourceRootMissing {
                path: self.layout.source_root.as_path().to_path_buf(),
            });
        }

        self.create_roots()?;

        let mut state = RunState::new(self.config);

        for category in &self.layout.documents {
            let report = self.process_category(&mut state, category);
            state.categories.push(report);
        }

        tracing::info!(count = state.assets.len(), "Collected asset references");
        let assets = AssetPropagator::new(self.system, self.layout.assets.as_ref())
            .propagate(&state.assets);
        state.changes.extend(assets.changed.iter().cloned());

        let manifest = self.write_manifest(&mut state);

        Ok(state.into_report(assets, manifest))
    }

    fn create_roots(&self) -> Result<()> {
        self.system.create_dir_all(&self.layout.backup_root)?;
        for category in self.layout.documents.iter().chain(&self.layout.assets) {
            self.system.create_dir_all(&category.target)?;
        }
        Ok(())
    }

    fn process_category(&self, state: &mut RunState, category: &CategoryPaths) -> CategoryReport {
        let span = tracing::info_span!("category", key = %category.key);
        let _guard = span.enter();

        let mut report = CategoryReport {
            key: category.key.clone(),
            ..CategoryReport::default()
        };

        if !self.system.is_dir(&category.source) {
            tracing::warn!(path = %category.source, "Category directory missing, skipping");
            report.missing = true;
            return report;
        }

        for entry in WalkDir::new(category.source.as_path())
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(filename) = entry.file_name().to_str() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 filename");
                continue;
            };
            if !self.config.is_document(filename) {
                continue;
            }
            if self.config.is_ignored(filename) {
                tracing::debug!(file = filename, "Ignored");
                report.ignored += 1;
                continue;
            }

            let rel = match AbsPath::new(entry.path().to_path_buf())
                .and_then(|path| path.strip_prefix(&category.source))
            {
                Ok(rel) => rel,
                Err(e) => {
                    tracing::error!(error = %e, "Unexpected path outside category");
                    report.failed += 1;
                    continue;
                }
            };

            self.process_document(state, &mut report, category, &rel, filename);
        }

        tracing::info!(
            updated = report.updated,
            skipped = report.skipped,
            ignored = report.ignored,
            failed = report.failed,
            "Category processed"
        );

        report
    }

    fn process_document(
        &self,
        state: &mut RunState,
        report: &mut CategoryReport,
        category: &CategoryPaths,
        rel: &RelPath,
        filename: &str,
    ) {
        let source = category.source.join(rel);
        let dest = category.target.join(rel);
        let dest_rel = category.target_rel.join(rel).to_slash_string();

        let text = match self.read_text(&source) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(file = %rel, error = %e, "Failed to read document");
                report.failed += 1;
                return;
            }
        };

        let transformed = self.transformer.transform(&text);
        state.assets.extend(transformed.assets);

        if change::document_needs_write(self.system, &dest, transformed.content.as_bytes()) {
            match self.system.write_file(&dest, transformed.content.as_bytes()) {
                Ok(()) => {
                    tracing::info!(file = %dest_rel, "Updated");
                    report.updated += 1;
                    state.changes.push(dest_rel.clone());
                }
                Err(e) => {
                    tracing::error!(file = %dest_rel, error = %e, "Failed to write document");
                    report.failed += 1;
                }
            }
        } else {
            tracing::debug!(file = %dest_rel, "Unchanged");
            report.skipped += 1;
        }

        let record = DocumentRecord::new(
            transformed.title,
            filename,
            dest_rel,
            self.config.manifest.date_format,
        );
        state
            .buckets
            .entry(category.key.clone())
            .or_default()
            .push(record);
    }

    fn read_text(&self, path: &AbsPath) -> Result<String> {
        let bytes = self.system.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8 {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    fn write_manifest(&self, state: &mut RunState) -> ManifestStatus {
        let text = manifest::build_manifest(&state.buckets, &self.config.manifest);
        let rel = self.config.manifest.filename.replace('\\', "/");

        if !change::document_needs_write(self.system, &self.manifest_path, text.as_bytes()) {
            tracing::debug!(file = %rel, "Manifest unchanged");
            return ManifestStatus::Unchanged;
        }

        match self.system.write_file(&self.manifest_path, text.as_bytes()) {
            Ok(()) => {
                tracing::info!(file = %rel, "Manifest written");
                state.changes.push(rel);
                ManifestStatus::Written
            }
            Err(e) => {
                tracing::error!(file = %rel, error = %e, "Failed to write manifest");
                ManifestStatus::Failed
            }
        }
    }
}
