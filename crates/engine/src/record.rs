//! Per-document metadata collected during a pass

use folio_config::DateFormat;
use regex::Regex;
use std::sync::LazyLock;

/// `YYYYMMDD_` filename prefix
static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})_").expect("Failed to compile date prefix pattern")
});

/// Calendar date encoded in a filename prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameDate {
    /// Year, never 0
    pub year: u32,
    /// Month, 1-12
    pub month: u32,
    /// Day, 1-31
    pub day: u32,
}

/// Parse the `YYYYMMDD_` prefix of a filename
///
/// Year 0, month outside 1-12 and day outside 1-31 count as no date.
///
/// # Examples
///
/// ```
/// use folio_engine::record::parse_filename_date;
///
/// let date = parse_filename_date("20230115_post.md").unwrap();
/// assert_eq!((date.year, date.month, date.day), (2023, 1, 15));
/// assert!(parse_filename_date("post.md").is_none());
/// ```
pub fn parse_filename_date(filename: &str) -> Option<FilenameDate> {
    let caps = DATE_PREFIX.captures(filename)?;
    let year: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    if year == 0 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(FilenameDate { year, month, day })
}

/// One transformed source document
///
/// `year == 0` exactly when `date_str` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Extracted title
    pub title: String,
    /// Source filename
    pub filename: String,
    /// Destination path relative to the backup root, `/`-separated
    pub dest_path: String,
    /// Year from the filename, 0 when undated
    pub year: u32,
    /// Month from the filename, 0 when undated
    pub month: u32,
    /// Day from the filename, 0 when undated
    pub day: u32,
    /// Rendered date, empty when undated
    pub date_str: String,
}

impl DocumentRecord {
    /// Build a record, deriving the date fields from the filename
    pub fn new(
        title: impl Into<String>,
        filename: impl Into<String>,
        dest_path: impl Into<String>,
        date_format: DateFormat,
    ) -> Self {
        let filename = filename.into();
        let (year, month, day, date_str) = match parse_filename_date(&filename) {
            Some(d) => (d.year, d.month, d.day, date_format.render(d.year, d.month, d.day)),
            None => (0, 0, 0, String::new()),
        };

        Self {
            title: title.into(),
            filename,
            dest_path: dest_path.into(),
            year,
            month,
            day,
            date_str,
        }
    }

    /// Whether a date could be parsed from the filename
    pub fn is_dated(&self) -> bool {
        self.year > 0
    }

    /// Sort key for date ordering
    pub fn date_key(&self) -> (u32, u32, u32) {
        (self.year, self.month, self.day)
    }
}
