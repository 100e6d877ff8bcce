use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of input the renaming workflow was pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    /// A bare video file that should get its own folder.
    MovieWithoutFolder,
    /// A folder holding one movie plus extras.
    MovieInFolder,
    /// A show folder holding season folders.
    ShowWithSeasons,
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MovieWithoutFolder => write!(f, "movie without folder"),
            Self::MovieInFolder => write!(f, "movie in folder"),
            Self::ShowWithSeasons => write!(f, "show"),
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaEntry {
    /// Entry name (no parent path).
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl MediaEntry {
    /// A file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    /// A directory entry.
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}
