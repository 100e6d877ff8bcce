use thiserror::Error;

/// Errors that can occur during Kirinuki inference.
#[derive(Debug, Error)]
pub enum KirinukiError {
    /// The input string is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// None of the episode rules matched the filename.
    #[error("unable to determine episode number for {filename:?}")]
    EpisodeNotFound {
        /// The filename that could not be numbered.
        filename: String,
    },

    /// A standalone file does not carry a known video extension.
    #[error("unknown file extension for {name:?}")]
    UnknownExtension {
        /// The offending file name.
        name: String,
    },

    /// A directory holds neither season folders nor a video file.
    #[error("failed to determine media type for {name:?}")]
    Unclassifiable {
        /// The directory name.
        name: String,
    },

    /// A regex pattern failed to compile. Patterns built from escaped titles
    /// and season numbers should never trigger this.
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

impl KirinukiError {
    /// Returns `true` when the error means "metadata not inferable", the one
    /// failure the renaming workflow must surface to the user.
    #[must_use]
    pub fn is_not_inferable(&self) -> bool {
        matches!(self, Self::EpisodeNotFound { .. })
    }
}

/// Result type alias for Kirinuki operations.
pub type Result<T> = std::result::Result<T, KirinukiError>;
