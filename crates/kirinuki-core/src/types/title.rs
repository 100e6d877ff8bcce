use std::fmt;

use serde::{Deserialize, Serialize};

/// Title and release year inferred from a show or movie name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleYear {
    /// Tag-stripped, trimmed name. Keeps dots, punctuation and any
    /// parenthesized year so it can be cut verbatim out of episode filenames.
    pub raw_title: String,

    /// Presentable title: truncated at the year, dots turned into spaces.
    pub clean_title: String,

    /// Release year, when one could be found.
    pub year: Option<u16>,
}

impl TitleYear {
    /// Creates a new `TitleYear`.
    #[must_use]
    pub fn new(
        raw_title: impl Into<String>,
        clean_title: impl Into<String>,
        year: Option<u16>,
    ) -> Self {
        Self {
            raw_title: raw_title.into(),
            clean_title: clean_title.into(),
            year,
        }
    }

    /// Canonical folder/file stem: `Clean Title (Year)` or just the title.
    #[must_use]
    pub fn canonical_stem(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TitleYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({year})", self.clean_title),
            None => write!(f, "{}", self.clean_title),
        }
    }
}
