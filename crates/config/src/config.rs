//! Configuration management
//!
//! This module handles loading and validating folio configuration. Every field
//! is typed and defaulted here so the engine never has to look anything up by
//! name at runtime.
//!
//! ```toml
//! [paths]
//! sourceRoot = "~/blog"
//! backupRoot = "~/blog-backup"
//!
//! [paths.sourceDirs]
//! posts = "content/posts"
//! pics = "static/pics"
//!
//! [paths.targetDirs]
//! posts = "posts"
//! pics = "pics"
//! ```

use crate::Result;
use folio_core::Error;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Date rendering used for manifest entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateFormat {
    /// `2023-01-15`
    #[default]
    #[serde(rename = "YYYY-MM-DD", alias = "iso")]
    Iso,
    /// `2023年1月15日`
    #[serde(rename = "long", alias = "YYYY年M月D日")]
    Long,
}

impl DateFormat {
    /// Render a calendar date in this format
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_config::DateFormat;
    ///
    /// assert_eq!(DateFormat::Iso.render(2023, 1, 15), "2023-01-15");
    /// assert_eq!(DateFormat::Long.render(2023, 1, 15), "2023年1月15日");
    /// ```
    #[must_use]
    pub fn render(self, year: u32, month: u32, day: u32) -> String {
        match self {
            Self::Iso => format!("{year:04}-{month:02}-{day:02}"),
            Self::Long => format!("{year}年{month}月{day}日"),
        }
    }
}

/// Filesystem layout section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the static-site source tree
    #[serde(default, rename = "sourceRoot", alias = "source_root")]
    pub source_root: Option<PathBuf>,

    /// Root of the backup tree
    #[serde(default, rename = "backupRoot", alias = "backup_root")]
    pub backup_root: Option<PathBuf>,

    /// Category identifier that holds binary assets instead of documents
    #[serde(default = "default_asset_category", rename = "assetCategory", alias = "asset_category")]
    pub asset_category: String,

    /// Category → subpath under the source root, in processing order
    #[serde(default, rename = "sourceDirs", alias = "source_dirs")]
    pub source_dirs: IndexMap<String, PathBuf>,

    /// Category → subpath under the backup root
    #[serde(default, rename = "targetDirs", alias = "target_dirs")]
    pub target_dirs: IndexMap<String, PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_root: None,
            backup_root: None,
            asset_category: default_asset_category(),
            source_dirs: IndexMap::new(),
            target_dirs: IndexMap::new(),
        }
    }
}

/// File selection section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Exact filenames that are never backed up (e.g. `_index.md`)
    #[serde(default, rename = "ignoreFiles", alias = "ignore_files")]
    pub ignore_files: Vec<String>,

    /// Document extensions, matched case-insensitively against the filename
    #[serde(
        default = "default_markdown_extensions",
        rename = "markdownExtensions",
        alias = "markdown_extensions"
    )]
    pub markdown_extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_files: Vec::new(),
            markdown_extensions: default_markdown_extensions(),
        }
    }
}

/// Asset reference discovery section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageConfig {
    /// Prefixes that mark an image path as living under the asset root
    ///
    /// The first matching prefix is stripped to obtain the asset-relative path.
    #[serde(default, rename = "pathPatterns", alias = "path_patterns")]
    pub path_patterns: Vec<String>,
}

/// Image link rewrite rules
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageCorrections {
    /// Prefixes to replace, applied in order
    #[serde(default, rename = "fromPatterns", alias = "from_patterns")]
    pub from_patterns: Vec<String>,

    /// Replacement prefix shared by every entry in `from_patterns`
    #[serde(default, rename = "toPattern", alias = "to_pattern")]
    pub to_pattern: String,
}

/// Link rewrite section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathCorrectionsConfig {
    /// Image link rewrites
    #[serde(default)]
    pub images: ImageCorrections,

    /// Article cross-reference rewrites: old directory name → new directory path
    #[serde(default)]
    pub articles: IndexMap<String, String>,
}

/// Display settings for one manifest category
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryDisplay {
    /// Section heading (defaults to the category identifier)
    #[serde(default)]
    pub name: Option<String>,

    /// Sort key; categories without one are listed last
    #[serde(default)]
    pub order: Option<u32>,
}

/// Manifest (README) section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Top-level heading
    #[serde(default = "default_manifest_title")]
    pub title: String,

    /// Manifest filename, written at the backup root
    #[serde(default = "default_manifest_filename")]
    pub filename: String,

    /// Date rendering for dated entries
    #[serde(default, rename = "dateFormat", alias = "date_format")]
    pub date_format: DateFormat,

    /// Title used when a document has no usable `title:` field
    #[serde(default = "default_unknown_title", rename = "unknownTitle", alias = "unknown_title")]
    pub unknown_title: String,

    /// Heading of the trailing section for undated documents
    #[serde(default = "default_other_heading", rename = "otherHeading", alias = "other_heading")]
    pub other_heading: String,

    /// Line rendered for a category without documents
    #[serde(
        default = "default_empty_placeholder",
        rename = "emptyPlaceholder",
        alias = "empty_placeholder"
    )]
    pub empty_placeholder: String,

    /// Per-category display settings
    #[serde(default)]
    pub categories: IndexMap<String, CategoryDisplay>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            title: default_manifest_title(),
            filename: default_manifest_filename(),
            date_format: DateFormat::default(),
            unknown_title: default_unknown_title(),
            other_heading: default_other_heading(),
            empty_placeholder: default_empty_placeholder(),
            categories: IndexMap::new(),
        }
    }
}

/// Console output section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable debug level logging
    #[serde(default)]
    pub verbose: bool,

    /// Print the run summary
    #[serde(default = "default_show_stats", rename = "showStats", alias = "show_stats")]
    pub show_stats: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            show_stats: default_show_stats(),
        }
    }
}

/// Folio configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Filesystem layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// File selection
    #[serde(default)]
    pub filters: FilterConfig,

    /// Asset reference discovery
    #[serde(default)]
    pub images: ImageConfig,

    /// Link rewrites
    #[serde(default, rename = "pathCorrections", alias = "path_corrections")]
    pub path_corrections: PathCorrectionsConfig,

    /// Manifest rendering
    #[serde(default, alias = "readme")]
    pub manifest: ManifestConfig,

    /// Console output
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_asset_category() -> String {
    "pics".to_string()
}

fn default_markdown_extensions() -> Vec<String> {
    vec![".md".to_string()]
}

fn default_manifest_title() -> String {
    "Blog Backup".to_string()
}

fn default_manifest_filename() -> String {
    "README.md".to_string()
}

fn default_unknown_title() -> String {
    "unknown title".to_string()
}

fn default_other_heading() -> String {
    "Other".to_string()
}

fn default_empty_placeholder() -> String {
    "No content yet".to_string()
}

fn default_show_stats() -> bool {
    true
}

impl Config {
    /// Load, normalize and validate configuration from a file
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as TOML.
    /// Relative paths resolve against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, does not parse, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = std::path::absolute(path.as_ref()).map_err(|e| {
            Error::Message(format!(
                "Failed to resolve config path {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let content = fs::read_to_string(&path).map_err(|e| {
            Error::Message(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
        let config = if is_json {
            Self::from_json_str(&content, base_dir)
        } else {
            Self::from_toml_str(&content, base_dir)
        };
        let config = config.map_err(|e| Error::Message(format!("{}: {e}", path.display())))?;

        tracing::debug!(
            path = %path.display(),
            categories = config.paths.source_dirs.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing or validation fails
    pub fn from_toml_str(toml_content: &str, base_dir: &Path) -> Result<Self> {
        let config: Self = toml::from_str(toml_content)
            .map_err(|e| Error::Message(format!("Failed to parse config TOML: {e}")))?;
        config.finish(base_dir)
    }

    /// Load configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns error if JSON parsing or validation fails
    pub fn from_json_str(json_content: &str, base_dir: &Path) -> Result<Self> {
        let config: Self = serde_json::from_str(json_content)
            .map_err(|e| Error::Message(format!("Failed to parse config JSON: {e}")))?;
        config.finish(base_dir)
    }

    fn finish(mut self, base_dir: &Path) -> Result<Self> {
        self.resolve_relative_paths(base_dir);
        self.normalize_extensions();
        self.validate()?;
        Ok(self)
    }

    /// Check the invariants the engine relies on
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first violated rule
    pub fn validate(&self) -> Result<()> {
        if self.paths.source_root.is_none() {
            return Err(Error::invalid_config("paths.sourceRoot is required"));
        }
        if self.paths.backup_root.is_none() {
            return Err(Error::invalid_config("paths.backupRoot is required"));
        }

        if let Some(key) = self
            .paths
            .source_dirs
            .keys()
            .find(|key| !self.paths.target_dirs.contains_key(*key))
        {
            return Err(Error::invalid_config(format!(
                "category '{key}' has a source directory but no paths.targetDirs entry"
            )));
        }

        if self.document_categories().next().is_none() {
            return Err(Error::invalid_config(
                "paths.sourceDirs must contain at least one document category",
            ));
        }

        if self
            .filters
            .markdown_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(Error::invalid_config(
                "filters.markdownExtensions must not contain empty entries",
            ));
        }

        if self.manifest.filename.trim().is_empty() {
            return Err(Error::invalid_config("manifest.filename must not be empty"));
        }

        Ok(())
    }

    /// Document categories in configured order (every source category except the asset one)
    pub fn document_categories(&self) -> impl Iterator<Item = &str> {
        self.paths
            .source_dirs
            .keys()
            .map(String::as_str)
            .filter(|key| *key != self.paths.asset_category)
    }

    /// Check whether a filename carries one of the configured document extensions
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.is_document("Hello.MD"));
    /// assert!(!config.is_document("cover.png"));
    /// ```
    pub fn is_document(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.filters
            .markdown_extensions
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
    }

    /// Check whether a filename is on the ignore list
    pub fn is_ignored(&self, filename: &str) -> bool {
        self.filters.ignore_files.iter().any(|f| f == filename)
    }

    fn normalize_extensions(&mut self) {
        for ext in &mut self.filters.markdown_extensions {
            let lower = ext.trim().to_lowercase();
            *ext = if lower.starts_with('.') {
                lower
            } else {
                format!(".{lower}")
            };
        }
    }

    /// Resolve the two root paths against the config file's directory
    ///
    /// Category subpaths are left alone; they are joined onto the roots later.
    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        if let Some(ref root) = self.paths.source_root {
            self.paths.source_root = Some(Self::resolve_path(root, base_dir));
        }
        if let Some(ref root) = self.paths.backup_root {
            self.paths.backup_root = Some(Self::resolve_path(root, base_dir));
        }
    }

    /// Resolve a single path: expand ~/ and resolve relative paths
    fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();

        // First expand ~/
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = ::dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~"
            && let Some(home) = ::dirs::home_dir()
        {
            return home;
        }

        if path.is_relative() {
            base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }
}
