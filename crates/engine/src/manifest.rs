//! Manifest rendering
//!
//! Renders the index document listing every backed-up document, grouped by
//! category and then by year. Pure: the caller decides whether to write it.

use crate::record::DocumentRecord;
use folio_config::ManifestConfig;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Documents collected per category, keyed by category identifier
pub type Buckets = IndexMap<String, Vec<DocumentRecord>>;

/// Render the manifest for all buckets
///
/// # Examples
///
/// ```
/// use folio_config::{DateFormat, ManifestConfig};
/// use folio_engine::manifest::{Buckets, build_manifest};
/// use folio_engine::record::DocumentRecord;
///
/// let mut buckets = Buckets::new();
/// buckets.insert(
///     "posts".to_string(),
///     vec![DocumentRecord::new("Hello", "20230115_hello.md", "posts/20230115_hello.md", DateFormat::Iso)],
/// );
///
/// let text = build_manifest(&buckets, &ManifestConfig::default());
/// assert!(text.contains("## 2023\n\n* 2023-01-15 [Hello](posts/20230115_hello.md)\n"));
/// ```
#[must_use]
pub fn build_manifest(buckets: &Buckets, config: &ManifestConfig) -> String {
    let mut out = format!("# {}\n\n", config.title);

    for key in ordered_categories(buckets, config) {
        let name = config
            .categories
            .get(key)
            .and_then(|display| display.name.as_deref())
            .unwrap_or(key);
        let _ = write!(out, "# {name}\n\n");

        let records = buckets.get(key).map(Vec::as_slice).unwrap_or_default();
        if records.is_empty() {
            let _ = write!(out, "{}\n\n", config.empty_placeholder);
            continue;
        }

        render_category(&mut out, records, config);
    }

    out
}

/// Category identifiers in display order
///
/// Configured `order` ascending; categories without one come last. Ties fall
/// back to the identifier so the output never depends on map order.
pub fn ordered_categories<'a>(buckets: &'a Buckets, config: &ManifestConfig) -> Vec<&'a str> {
    let mut keys: Vec<&str> = buckets.keys().map(String::as_str).collect();
    keys.sort_by_key(|key| {
        let order = config.categories.get(*key).and_then(|display| display.order);
        (order.is_none(), order, *key)
    });
    keys
}

fn render_category(out: &mut String, records: &[DocumentRecord], config: &ManifestConfig) {
    let mut by_year: BTreeMap<u32, Vec<&DocumentRecord>> = BTreeMap::new();
    let mut undated = Vec::new();

    for record in records {
        if record.is_dated() {
            by_year.entry(record.year).or_default().push(record);
        } else {
            undated.push(record);
        }
    }

    for (year, mut entries) in by_year.into_iter().rev() {
        // Stable: same-date entries keep discovery order
        entries.sort_by(|a, b| b.date_key().cmp(&a.date_key()));

        let _ = write!(out, "## {year}\n\n");
        for record in entries {
            let _ = writeln!(
                out,
                "* {} [{}]({})",
                record.date_str, record.title, record.dest_path
            );
        }
        out.push('\n');
    }

    if !undated.is_empty() {
        let _ = write!(out, "## {}\n\n", config.other_heading);
        for record in undated {
            let _ = writeln!(out, "* [{}]({})", record.title, record.dest_path);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use folio_config::{CategoryDisplay, DateFormat};

    fn record(title: &str, filename: &str) -> DocumentRecord {
        DocumentRecord::new(title, filename, format!("posts/{filename}"), DateFormat::Iso)
    }

    fn display(name: Option<&str>, order: Option<u32>) -> CategoryDisplay {
        CategoryDisplay {
            name: name.map(str::to_string),
            order,
        }
    }

    #[test]
    fn test_full_layout() {
        let mut config = ManifestConfig {
            title: "Backup".to_string(),
            ..ManifestConfig::default()
        };
        config
            .categories
            .insert("posts".to_string(), display(Some("Posts"), Some(1)));

        let mut buckets = Buckets::new();
        buckets.insert(
            "posts".to_string(),
            vec![
                record("Jan", "20230115_jan.md"),
                record("About", "about.md"),
                record("Old", "20221201_old.md"),
                record("Mar", "20230301_mar.md"),
            ],
        );

        let expected = "# Backup\n\n\
# Posts\n\n\
## 2023\n\n\
* 2023-03-01 [Mar](posts/20230301_mar.md)\n\
* 2023-01-15 [Jan](posts/20230115_jan.md)\n\n\
## 2022\n\n\
* 2022-12-01 [Old](posts/20221201_old.md)\n\n\
## Other\n\n\
* [About](posts/about.md)\n\n";

        assert_eq!(build_manifest(&buckets, &config), expected);
    }

    #[test]
    fn test_empty_category_placeholder() {
        let mut buckets = Buckets::new();
        buckets.insert("notes".to_string(), Vec::new());

        let text = build_manifest(&buckets, &ManifestConfig::default());
        assert_eq!(text, "# Blog Backup\n\n# notes\n\nNo content yet\n\n");
    }

    #[test]
    fn test_same_date_keeps_discovery_order() {
        let mut buckets = Buckets::new();
        buckets.insert(
            "posts".to_string(),
            vec![record("A", "20230115_a.md"), record("B", "20230115_b.md")],
        );

        let text = build_manifest(&buckets, &ManifestConfig::default());
        let a = text.find("[A]").unwrap();
        let b = text.find("[B]").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_category_ordering() {
        let mut config = ManifestConfig::default();
        config.categories.insert("zeta".to_string(), display(None, Some(1)));
        config.categories.insert("beta".to_string(), display(None, Some(2)));
        config.categories.insert("alpha".to_string(), display(Some("A"), None));

        let mut buckets = Buckets::new();
        for key in ["gamma", "alpha", "beta", "zeta"] {
            buckets.insert(key.to_string(), Vec::new());
        }

        assert_eq!(
            ordered_categories(&buckets, &config),
            vec!["zeta", "beta", "alpha", "gamma"]
        );
    }

    #[test]
    fn test_every_record_is_listed_once() {
        let records: Vec<_> = (1..=9)
            .map(|d| record(&format!("T{d}"), &format!("2023010{d}_p{d}.md")))
            .chain([record("U", "undated.md")])
            .collect();
        let mut buckets = Buckets::new();
        buckets.insert("posts".to_string(), records.clone());

        let text = build_manifest(&buckets, &ManifestConfig::default());
        for r in &records {
            assert_eq!(text.matches(&format!("]({})", r.dest_path)).count(), 1);
        }
    }

    #[test]
    fn test_long_dates_and_custom_headings() {
        let config = ManifestConfig {
            other_heading: "Misc".to_string(),
            ..ManifestConfig::default()
        };
        let mut buckets = Buckets::new();
        buckets.insert(
            "posts".to_string(),
            vec![
                DocumentRecord::new("L", "20230105_l.md", "posts/20230105_l.md", DateFormat::Long),
                record("U", "u.md"),
            ],
        );

        let text = build_manifest(&buckets, &config);
        assert!(text.contains("* 2023年1月5日 [L](posts/20230105_l.md)\n"));
        assert!(text.contains("## Misc\n\n* [U](posts/u.md)\n"));
    }
}
