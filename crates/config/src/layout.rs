//! Resolved filesystem layout
//!
//! Turns the category → subpath maps of [`Config`] into absolute roots the
//! engine can use directly. Built once per run; never mutated afterwards.

use crate::{Config, Result};
use folio_core::Error;
use folio_core::path::{AbsPath, RelPath};
use std::path::PathBuf;

/// Source and destination directories of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPaths {
    /// Category identifier (e.g. `posts`)
    pub key: String,
    /// Absolute source directory
    pub source: AbsPath,
    /// Absolute destination directory
    pub target: AbsPath,
    /// Destination directory relative to the backup root
    pub target_rel: RelPath,
}

/// Every path a sync pass reads from or writes to
#[derive(Debug, Clone)]
pub struct Layout {
    /// Root of the static-site source tree
    pub source_root: AbsPath,
    /// Root of the backup tree (the manifest lives here)
    pub backup_root: AbsPath,
    /// Document categories in configured order
    pub documents: Vec<CategoryPaths>,
    /// Asset category, when one is configured
    pub assets: Option<CategoryPaths>,
}

impl Layout {
    /// Resolve the layout described by a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a root is missing or not absolute, if a
    /// source subpath is absolute, or if a target subpath escapes the backup root.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source_root = Self::root(config.paths.source_root.as_ref(), "paths.sourceRoot")?;
        let backup_root = Self::root(config.paths.backup_root.as_ref(), "paths.backupRoot")?;

        let mut documents = Vec::new();
        let mut assets = None;

        for (key, source_sub) in &config.paths.source_dirs {
            let target_sub = config.paths.target_dirs.get(key).ok_or_else(|| {
                Error::invalid_config(format!("category '{key}' has no paths.targetDirs entry"))
            })?;

            let source_rel = RelPath::new(source_sub.clone()).map_err(|_| {
                Error::invalid_config(format!(
                    "paths.sourceDirs.{key} must be relative to paths.sourceRoot"
                ))
            })?;
            let target_rel = RelPath::contained(target_sub).map_err(|_| {
                Error::invalid_config(format!(
                    "paths.targetDirs.{key} must be a subdirectory of paths.backupRoot"
                ))
            })?;

            let category = CategoryPaths {
                key: key.clone(),
                source: source_root.join(&source_rel),
                target: backup_root.join(&target_rel),
                target_rel,
            };

            if *key == config.paths.asset_category {
                assets = Some(category);
            } else {
                documents.push(category);
            }
        }

        Ok(Self {
            source_root,
            backup_root,
            documents,
            assets,
        })
    }

    /// Absolute path of the manifest document
    pub fn manifest_path(&self, config: &Config) -> Result<AbsPath> {
        let rel = RelPath::contained(&config.manifest.filename).map_err(|_| {
            Error::invalid_config("manifest.filename must be a path inside paths.backupRoot")
        })?;
        Ok(self.backup_root.join(&rel))
    }

    fn root(path: Option<&PathBuf>, field: &str) -> Result<AbsPath> {
        let path = path.ok_or_else(|| Error::invalid_config(format!("{field} is required")))?;
        AbsPath::new(path.clone())
            .map_err(|_| Error::invalid_config(format!("{field} must resolve to an absolute path")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::path::Path;

    const CONFIG: &str = r#"
[paths]
sourceRoot = "/blog"
backupRoot = "/backup"

[paths.sourceDirs]
posts = "content/posts"
pics = "static/pics"
notes = "content/notes"

[paths.targetDirs]
posts = "posts"
pics = "pics"
notes = "notes"
"#;

    #[cfg(unix)]
    #[test]
    fn test_layout_splits_assets_from_documents() {
        let config = Config::from_toml_str(CONFIG, Path::new("/")).unwrap();
        let layout = Layout::from_config(&config).unwrap();

        let keys: Vec<_> = layout.documents.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["posts", "notes"]);

        let assets = layout.assets.unwrap();
        assert_eq!(assets.source.as_path(), Path::new("/blog/static/pics"));
        assert_eq!(assets.target.as_path(), Path::new("/backup/pics"));
        assert_eq!(assets.target_rel.to_slash_string(), "pics");
    }

    #[cfg(unix)]
    #[test]
    fn test_layout_without_asset_category() {
        let toml = CONFIG.replace("pics = \"static/pics\"\n", "");
        let config = Config::from_toml_str(&toml, Path::new("/")).unwrap();
        let layout = Layout::from_config(&config).unwrap();

        assert!(layout.assets.is_none());
        assert_eq!(layout.documents.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_escaping_target_is_rejected() {
        let toml = CONFIG.replace("notes = \"notes\"", "notes = \"../notes\"");
        let config = Config::from_toml_str(&toml, Path::new("/")).unwrap();

        let err = Layout::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("paths.targetDirs.notes"));
    }

    #[cfg(unix)]
    #[test]
    fn test_manifest_path() {
        let config = Config::from_toml_str(CONFIG, Path::new("/")).unwrap();
        let layout = Layout::from_config(&config).unwrap();

        let manifest = layout.manifest_path(&config).unwrap();
        assert_eq!(manifest.as_path(), Path::new("/backup/README.md"));
    }
}
