use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::parser::tags::strip_tags;
use crate::types::TitleYear;

/// Scene indexer credit prefixed to release names, e.g. `www.UIndex.org    -    `.
pub(crate) const INDEXER_CREDIT_PATTERN: &str = r"(?i)www\.[a-z0-9\-]+\.[a-z]{2,4}\s*-\s*";

/// Splits a show or movie name into raw title, clean title and year.
pub struct TitleYearExtractor {
    re_paren_year: Regex,
    re_bare_year: Regex,
    re_indexer: Regex,
    re_dot_run: Regex,
}

impl TitleYearExtractor {
    /// Constructs a new `TitleYearExtractor` with pre-compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_paren_year: Regex::new(r"\((\d{4})\)")?,
            re_bare_year: Regex::new(r"(?:19|20)\d{2}")?,
            re_indexer: Regex::new(INDEXER_CREDIT_PATTERN)?,
            re_dot_run: Regex::new(r"\.+(\w+)")?,
        })
    }

    /// Infers title and year.
    ///
    /// `name` is the entry's base name (directory name verbatim, or file name
    /// without its extension). `original` is the untruncated entry name; year
    /// searches run against it.
    pub fn extract(&self, name: &str, original: &str) -> TitleYear {
        let (working, year) = self.cut_at_year(name, original);

        let raw_title = strip_tags(name).trim().to_string();

        let clean = self.re_indexer.replacen(working, 1, "");
        let clean = self.re_dot_run.replace_all(&clean, " ${1}");
        let clean_title = strip_tags(&clean).trim().to_string();

        debug!(raw = %raw_title, clean = %clean_title, ?year, "title inferred");

        TitleYear {
            raw_title,
            clean_title,
            year,
        }
    }

    /// Returns the working name truncated at the year, plus the year itself.
    fn cut_at_year<'a>(&self, name: &'a str, original: &str) -> (&'a str, Option<u16>) {
        if let Some(caps) = self.re_paren_year.captures(original) {
            let year = caps[1].parse().ok();
            let working = match name.find(&caps[0]) {
                Some(pos) => &name[..pos],
                None => name,
            };
            return (working, year);
        }

        if let Some(m) = self.re_bare_year.find(original) {
            let year = m.as_str().parse().ok();
            let cut = name
                .find(&format!(".{}", m.as_str()))
                .or_else(|| name.find(&format!(" {}", m.as_str())));
            let working = match cut {
                Some(pos) => &name[..pos],
                None => name,
            };
            return (working, year);
        }

        (name, None)
    }
}
