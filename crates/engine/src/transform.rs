//! Document transformation
//!
//! Turns one source document into its backup form:
//! 1. Extract the title from the `---` header block
//! 2. Collect image references that point into the asset root
//! 3. Strip the header
//! 4. Rewrite image and article links
//! 5. Prepend the title as a level-one heading
//!
//! The transformer is a pure function of (text, configuration). Regex parsing
//! stays private to this module so it can be replaced by a structured parser
//! without touching callers.

use folio_config::Config;
use folio_core::{Error, Result};
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Header block at the very start of a document
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)")
        .expect("Failed to compile header pattern")
});

/// `title:` field inside a header, value optionally quoted
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*title[ \t]*:[ \t]*["']?(.*?)["']?[ \t]*\r?$"#)
        .expect("Failed to compile title pattern")
});

/// Markdown image embed `![alt](path)`
static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\(([^)]+)\)").expect("Failed to compile image pattern")
});

/// Output of transforming one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Rendered backup text
    pub content: String,
    /// Extracted title, or the configured unknown-title sentinel
    pub title: String,
    /// Asset paths relative to the asset root, deduplicated and sorted
    pub assets: BTreeSet<String>,
}

/// Article rewrite for one old directory
#[derive(Debug)]
struct ArticleRewrite {
    /// `[text](/old/rest)`
    nested: Regex,
    /// `[text](/old)` and `[text](/old/...)` left over by `nested`
    bare: Regex,
    to: String,
}

/// Pure document transformer built once from configuration
#[derive(Debug)]
pub struct DocumentTransformer {
    known_prefixes: Vec<String>,
    image_rewrites: Vec<Regex>,
    image_target: String,
    article_rewrites: Vec<ArticleRewrite>,
    unknown_title: String,
}

impl DocumentTransformer {
    /// Compile the rewrite rules of a configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a rewrite rule does not compile.
    pub fn new(config: &Config) -> Result<Self> {
        let image_rewrites = config
            .path_corrections
            .images
            .from_patterns
            .iter()
            .map(|from| {
                compile(&format!(
                    r"!\[([^\]]*)\]\({}([^)]+)\)",
                    regex::escape(from)
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let article_rewrites = config
            .path_corrections
            .articles
            .iter()
            .map(|(old, new)| {
                Ok::<_, Error>(ArticleRewrite {
                    nested: compile(&format!(
                        r"\[([^\]]+)\]\({}([^)]*)\)",
                        regex::escape(&format!("/{old}/"))
                    ))?,
                    bare: compile(&format!(
                        r"\[([^\]]+)\]\({}(/[^)]*)?\)",
                        regex::escape(&format!("/{old}"))
                    ))?,
                    to: new.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            known_prefixes: config.images.path_patterns.clone(),
            image_rewrites,
            image_target: config.path_corrections.images.to_pattern.clone(),
            article_rewrites,
            unknown_title: config.manifest.unknown_title.clone(),
        })
    }

    /// Transform one document
    ///
    /// Never fails: a missing or malformed header only degrades the title.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_config::Config;
    /// use folio_engine::transform::DocumentTransformer;
    ///
    /// let transformer = DocumentTransformer::new(&Config::default()).unwrap();
    /// let out = transformer.transform("---\ntitle: Hello\n---\nBody\n");
    /// assert_eq!(out.content, "# Hello\n\nBody");
    /// assert_eq!(out.title, "Hello");
    /// ```
    pub fn transform(&self, text: &str) -> Transformed {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let title = self.extract_title(text);
        let assets = self.extract_assets(text);
        let body = self.rewrite_links(strip_header(text));

        Transformed {
            content: format!("# {title}\n\n{}", body.trim()),
            title,
            assets,
        }
    }

    /// Title from the header block, or the unknown-title sentinel
    pub fn extract_title(&self, text: &str) -> String {
        header(text)
            .and_then(|header| TITLE_PATTERN.captures(header))
            .map(|caps| caps[1].trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.unknown_title.clone())
    }

    /// Asset-relative paths of every image under a known prefix
    ///
    /// Scans the whole text, header included. Fragments (`#...`) and link
    /// titles are dropped; images outside the known prefixes are ignored.
    pub fn extract_assets(&self, text: &str) -> BTreeSet<String> {
        IMAGE_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let target = caps.get(1)?.as_str();
                let path = target.split_whitespace().next()?;
                let path = path.split('#').next().unwrap_or(path);

                self.known_prefixes
                    .iter()
                    .find(|prefix| path.starts_with(prefix.as_str()))
                    .map(|prefix| path[prefix.len()..].to_string())
            })
            .filter(|relative| !relative.is_empty())
            .collect()
    }

    /// Apply image rewrites, then article rewrites, in configured order
    pub fn rewrite_links(&self, body: &str) -> String {
        let mut content = body.to_string();

        for pattern in &self.image_rewrites {
            content = pattern
                .replace_all(&content, |caps: &Captures| {
                    format!("![{}]({}{})", &caps[1], self.image_target, &caps[2])
                })
                .into_owned();
        }

        for rule in &self.article_rewrites {
            content = rule
                .nested
                .replace_all(&content, |caps: &Captures| {
                    format!("[{}]({}{})", &caps[1], rule.to, &caps[2])
                })
                .into_owned();

            let bare_target = rule.to.trim_end_matches('/');
            content = rule
                .bare
                .replace_all(&content, |caps: &Captures| {
                    let rest = caps.get(2).map_or("", |m| m.as_str());
                    format!("[{}]({bare_target}{rest})", &caps[1])
                })
                .into_owned();
        }

        content
    }
}

/// Text of the header block, without its delimiters
fn header(text: &str) -> Option<&str> {
    HEADER_PATTERN
        .captures(text)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
}

/// Document text with a leading header block removed
///
/// # Examples
///
/// ```
/// use folio_engine::transform::strip_header;
///
/// assert_eq!(strip_header("---\ntitle: x\n---\nbody"), "body");
/// assert_eq!(strip_header("no header"), "no header");
/// ```
pub fn strip_header(text: &str) -> &str {
    HEADER_PATTERN
        .find(text)
        .map_or(text, |m| &text[m.end()..])
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::invalid_config(format!("invalid rewrite rule '{pattern}': {e}")))
}
