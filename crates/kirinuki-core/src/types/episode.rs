use std::fmt;

use serde::{Deserialize, Serialize};

/// Episode numbering, title and part marker inferred from one filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeInfo {
    /// Episode numbers, contiguous and strictly increasing. Never empty when
    /// produced by the extractor.
    pub numbers: Vec<u32>,

    /// Episode title left over after removing the show name and release noise.
    pub name: Option<String>,

    /// Part marker such as `a`, `ab` or `2`.
    pub parts: Option<String>,
}

impl EpisodeInfo {
    /// Builds the inclusive range `start..=end`. A missing or inverted end
    /// collapses to the single episode `start`.
    #[must_use]
    pub fn from_range(start: u32, end: Option<u32>) -> Self {
        let end = end.filter(|&end| end > start).unwrap_or(start);
        Self {
            numbers: (start..=end).collect(),
            name: None,
            parts: None,
        }
    }

    /// First episode number.
    #[must_use]
    pub fn first(&self) -> Option<u32> {
        self.numbers.first().copied()
    }

    /// Last episode number.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.numbers.last().copied()
    }

    /// Returns `true` if the file covers more than one episode.
    #[must_use]
    pub fn is_multi_episode(&self) -> bool {
        self.numbers.len() > 1
    }

    /// Season-qualified code, e.g. `S01E09-E10`.
    #[must_use]
    pub fn code(&self, season: u32) -> String {
        format!("S{season:02}{self}")
    }
}

impl fmt::Display for EpisodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) if first != last => write!(f, "E{first:02}-E{last:02}"),
            (Some(first), _) => write!(f, "E{first:02}"),
            _ => Ok(()),
        }
    }
}
