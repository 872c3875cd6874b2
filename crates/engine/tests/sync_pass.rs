//! Integration tests for full sync passes

#![allow(clippy::unwrap_used)]

use folio_config::Config;
use folio_engine::system::Operation;
use folio_engine::{DryRunSystem, ManifestStatus, RealSystem, SyncOrchestrator, SyncReport};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A blog source tree and backup destination inside a temp directory
struct Fixture {
    temp: TempDir,
    config: Config,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let toml = format!(
            r#"
[paths]
sourceRoot = '{source}'
backupRoot = '{backup}'

[paths.sourceDirs]
posts = "content/posts"
notes = "content/notes"
pics = "static/pics"

[paths.targetDirs]
posts = "posts"
notes = "notes"
pics = "pics"

[filters]
ignoreFiles = ["_index.md"]

[images]
pathPatterns = ["/pics/"]

[pathCorrections.images]
fromPatterns = ["/old/img/"]
toPattern = "/img/"

[pathCorrections.articles]
drafts = "/posts/"

[manifest]
title = "Blog Backup"

[manifest.categories.posts]
name = "Posts"
order = 1

[manifest.categories.notes]
name = "Notes"
order = 2
"#,
            source = temp.path().join("site").display(),
            backup = temp.path().join("backup").display(),
        );
        let config = Config::from_toml_str(&toml, temp.path()).unwrap();
        Self { temp, config }
    }

    fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.temp.path().join("site").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn backup(&self, rel: &str) -> PathBuf {
        self.temp.path().join("backup").join(rel)
    }

    fn read_backup(&self, rel: &str) -> String {
        fs::read_to_string(self.backup(rel)).unwrap()
    }

    fn run(&self) -> SyncReport {
        SyncOrchestrator::new(&RealSystem, &self.config)
            .unwrap()
            .run()
            .unwrap()
    }

    /// Every file under the backup root with its bytes, in path order
    fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let root = self.temp.path().join("backup");
        WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .map(Result::unwrap)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(&root).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    fn seed_blog(&self) {
        self.write(
            "content/posts/20230115_hello.md",
            "---\ntitle: \"Hello, World\"\n---\n![cover](/pics/a.png)\nSee [draft](/drafts/next).\n",
        );
        self.write(
            "content/posts/20230301_later.md",
            "---\ntitle: Later\n---\n![c](/pics/sub/c.png)\n![old](/old/img/x.png)\n",
        );
        self.write("content/posts/about.md", "No header here\n");
        self.write("content/posts/_index.md", "---\ntitle: Index\n---\n");
        self.write("content/notes/20221201_note.md", "---\ntitle: 'Note'\n---\nbody\n");
        self.write("static/pics/a.png", b"A");
        self.write("static/pics/b.png", b"B");
        self.write("static/pics/sub/c.png", b"C");
    }
}

fn assert_exists(path: &Path) {
    assert!(path.exists(), "{} should exist", path.display());
}

#[test]
fn test_first_pass_writes_everything() {
    let fixture = Fixture::new();
    fixture.seed_blog();

    let report = fixture.run();

    assert_eq!(report.documents_updated(), 4);
    assert_eq!(report.categories[0].ignored, 1);
    assert_eq!(report.manifest, ManifestStatus::Written);
    assert_eq!(report.failures(), 0);
    assert_eq!(
        report.changes,
        vec![
            "posts/20230115_hello.md",
            "posts/20230301_later.md",
            "posts/about.md",
            "notes/20221201_note.md",
            "pics/a.png",
            "pics/sub/c.png",
            "README.md",
        ]
    );
    assert!(!fixture.backup("posts/_index.md").exists());
}

#[test]
fn test_second_pass_writes_nothing() {
    let fixture = Fixture::new();
    fixture.seed_blog();

    fixture.run();
    let before = fixture.snapshot();
    let report = fixture.run();

    assert!(report.is_unchanged());
    assert_eq!(report.documents_updated(), 0);
    assert_eq!(report.documents_skipped(), 4);
    assert_eq!(report.assets.copied, 0);
    assert_eq!(report.assets.skipped, 2);
    assert_eq!(report.manifest, ManifestStatus::Unchanged);
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn test_only_referenced_assets_are_copied() {
    let fixture = Fixture::new();
    fixture.seed_blog();

    let report = fixture.run();

    assert_exists(&fixture.backup("pics/a.png"));
    assert_exists(&fixture.backup("pics/sub/c.png"));
    assert!(!fixture.backup("pics/b.png").exists());
    assert_eq!(report.referenced_assets, 2);
    assert_eq!(report.assets.copied, 2);
    assert_eq!(report.assets.orphans, 1);
}

#[test]
fn test_changed_asset_is_recopied() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.run();

    fixture.write("static/pics/a.png", b"A2");
    let report = fixture.run();

    assert_eq!(report.changes, vec!["pics/a.png"]);
    assert_eq!(fs::read(fixture.backup("pics/a.png")).unwrap(), b"A2");
}

#[test]
fn test_manifest_lists_every_document() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.run();

    let expected = "# Blog Backup\n\n\
# Posts\n\n\
## 2023\n\n\
* 2023-03-01 [Later](posts/20230301_later.md)\n\
* 2023-01-15 [Hello, World](posts/20230115_hello.md)\n\n\
## Other\n\n\
* [unknown title](posts/about.md)\n\n\
# Notes\n\n\
## 2022\n\n\
* 2022-12-01 [Note](notes/20221201_note.md)\n\n";

    assert_eq!(fixture.read_backup("README.md"), expected);
}

#[test]
fn test_documents_are_transformed() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.run();

    assert_eq!(
        fixture.read_backup("posts/20230115_hello.md"),
        "# Hello, World\n\n![cover](/pics/a.png)\nSee [draft](/posts/next)."
    );
    assert_eq!(
        fixture.read_backup("posts/20230301_later.md"),
        "# Later\n\n![c](/pics/sub/c.png)\n![old](/img/x.png)"
    );
    assert_eq!(
        fixture.read_backup("posts/about.md"),
        "# unknown title\n\nNo header here"
    );
}

#[test]
fn test_source_change_with_same_output_is_not_written() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.run();

    // Header fields other than the title do not reach the output
    fixture.write(
        "content/notes/20221201_note.md",
        "---\ntitle: 'Note'\ntags: [rust]\n---\nbody\n\n",
    );
    let report = fixture.run();

    assert!(report.is_unchanged());
}

#[test]
fn test_deleted_destination_is_rewritten() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.run();

    fs::remove_file(fixture.backup("notes/20221201_note.md")).unwrap();
    let report = fixture.run();

    assert_eq!(report.changes, vec!["notes/20221201_note.md"]);
}

#[test]
fn test_dry_run_writes_nothing_and_reports_same_changes() {
    let fixture = Fixture::new();
    fixture.seed_blog();

    let dry = DryRunSystem::new();
    let dry_report = SyncOrchestrator::new(&dry, &fixture.config)
        .unwrap()
        .run()
        .unwrap();

    assert!(!fixture.backup("").exists());
    let writes = dry
        .operations()
        .iter()
        .filter(|op| !matches!(op, Operation::CreateDir { .. }))
        .count();
    assert_eq!(writes, dry_report.changes.len());

    let real_report = fixture.run();
    assert_eq!(dry_report.changes, real_report.changes);
}

#[test]
fn test_unreadable_document_does_not_abort_the_pass() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.write("content/posts/20230201_broken.md", [0xff_u8, 0xfe, 0x00, 0x80]);

    let report = fixture.run();

    assert_eq!(report.categories[0].failed, 1);
    assert_eq!(report.documents_updated(), 4);
    assert!(!fixture.backup("posts/20230201_broken.md").exists());
    assert!(!fixture.read_backup("README.md").contains("broken"));
}

#[test]
fn test_missing_category_directory_is_skipped() {
    let fixture = Fixture::new();
    fixture.write("content/posts/post.md", "---\ntitle: Only\n---\n");

    let report = fixture.run();

    let notes = &report.categories[1];
    assert_eq!(notes.key, "notes");
    assert!(notes.missing);
    assert!(
        fixture
            .read_backup("README.md")
            .contains("# Notes\n\nNo content yet\n\n")
    );
}

#[test]
fn test_long_date_format() {
    let fixture = Fixture::new();
    let mut config = fixture.config.clone();
    config.manifest.date_format = folio_config::DateFormat::Long;
    fixture.write("content/posts/20230105_x.md", "---\ntitle: X\n---\n");

    SyncOrchestrator::new(&RealSystem, &config)
        .unwrap()
        .run()
        .unwrap();

    assert!(
        fixture
            .read_backup("README.md")
            .contains("* 2023年1月5日 [X](posts/20230105_x.md)\n")
    );
}

#[test]
fn test_missing_asset_root_is_not_fatal() {
    let fixture = Fixture::new();
    fixture.write("content/posts/p.md", "![a](/pics/a.png)\n");

    let report = fixture.run();

    assert_eq!(report.referenced_assets, 1);
    assert_eq!(report.assets.copied, 0);
    assert_eq!(report.failures(), 0);
}

#[test]
fn test_changed_correction_rule_rewrites_document() {
    let fixture = Fixture::new();
    fixture.seed_blog();
    fixture.run();

    let mut config = fixture.config.clone();
    config
        .path_corrections
        .articles
        .insert("drafts".to_string(), "/archive/".to_string());
    let report = SyncOrchestrator::new(&RealSystem, &config)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.changes, vec!["posts/20230115_hello.md"]);
    assert_eq!(report.documents_updated(), 1);
    assert_eq!(
        fixture.read_backup("posts/20230115_hello.md"),
        "# Hello, World\n\n![cover](/pics/a.png)\nSee [draft](/archive/next)."
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_documents_and_assets_are_followed() {
    use std::os::unix::fs::symlink;

    let fixture = Fixture::new();
    let shared = fixture.temp.path().join("shared");
    fs::create_dir_all(&shared).unwrap();
    fs::write(
        shared.join("linked.md"),
        "---\ntitle: Linked\n---\n![l](/pics/linked.png)\n",
    )
    .unwrap();
    fs::write(shared.join("linked.png"), b"L").unwrap();
    fs::write(shared.join("spare.png"), b"S").unwrap();

    fixture.write("content/posts/20230401_plain.md", "---\ntitle: Plain\n---\n");
    let site = fixture.temp.path().join("site");
    fs::create_dir_all(site.join("static/pics")).unwrap();
    symlink(
        shared.join("linked.md"),
        site.join("content/posts/20230402_linked.md"),
    )
    .unwrap();
    symlink(shared.join("linked.png"), site.join("static/pics/linked.png")).unwrap();
    symlink(shared.join("spare.png"), site.join("static/pics/spare.png")).unwrap();

    let report = fixture.run();

    assert_eq!(report.categories[0].updated, 2);
    assert_eq!(
        fixture.read_backup("posts/20230402_linked.md"),
        "# Linked\n\n![l](/pics/linked.png)"
    );
    assert_eq!(fs::read(fixture.backup("pics/linked.png")).unwrap(), b"L");
    assert_eq!(report.assets.copied, 1);
    assert_eq!(report.assets.orphans, 1);
    assert!(
        fixture
            .read_backup("README.md")
            .contains("[Linked](posts/20230402_linked.md)")
    );
}
