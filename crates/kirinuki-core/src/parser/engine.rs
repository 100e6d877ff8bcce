//! # Inference Engine
//!
//! Bundles the extractors behind one configured entry point, plus free
//! functions that run with default settings.

use crate::error::{KirinukiError, Result};
use crate::parser::duplicates::{
    DEFAULT_DUPLICATE_THRESHOLD, DuplicateTokenSuppressor, DuplicateTokens,
};
use crate::parser::episode::{EpisodeExtractor, SeasonContext};
use crate::parser::title::TitleYearExtractor;
use crate::parser::tokenizer::{MIN_FRAGMENT_LEN, Tokenizer};
use crate::types::{EpisodeInfo, TitleYear};

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    /// Share of a season's files a fragment must appear in to count as
    /// duplicate.
    pub duplicate_threshold: f64,
    /// Shortest fragment (in characters) considered for duplicate detection.
    pub min_token_len: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            min_token_len: MIN_FRAGMENT_LEN,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate-token threshold, clamped to `0.0..=1.0`.
    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum fragment length for duplicate detection.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }
}

/// Title, duplicate and episode inference under one configuration.
pub struct Engine {
    config: InferenceConfig,
    titles: TitleYearExtractor,
    suppressor: DuplicateTokenSuppressor,
}

impl Engine {
    /// Create an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::RegexError` if a pattern fails to compile.
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let suppressor = DuplicateTokenSuppressor::new(
            config.duplicate_threshold,
            Tokenizer::new().with_min_len(config.min_token_len),
        );
        Ok(Self {
            titles: TitleYearExtractor::new()?,
            suppressor,
            config,
        })
    }

    /// Create an engine with default configuration.
    ///
    /// # Errors
    ///
    /// See [`Engine::new`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(InferenceConfig::default())
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// The title extractor, for callers comparing candidate files against a
    /// known title.
    pub fn title_extractor(&self) -> &TitleYearExtractor {
        &self.titles
    }

    /// Infers title and year of a show or movie.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::EmptyInput` if `name` is blank.
    ///
    /// # Examples
    /// ```
    /// use kirinuki_core::parser::Engine;
    ///
    /// let engine = Engine::with_defaults().unwrap();
    /// let title = engine.title_year("Harry Potter and the Chamber of Secrets (2002)", "").unwrap();
    ///
    /// assert_eq!(title.clean_title, "Harry Potter and the Chamber of Secrets");
    /// assert_eq!(title.year, Some(2002));
    /// ```
    pub fn title_year(&self, name: &str, original: &str) -> Result<TitleYear> {
        if name.trim().is_empty() {
            return Err(KirinukiError::EmptyInput);
        }
        let original = if original.is_empty() { name } else { original };
        Ok(self.titles.extract(name, original))
    }

    /// Finds the fragments shared by a season's filenames.
    pub fn duplicate_tokens<S: AsRef<str>>(&self, filenames: &[S]) -> DuplicateTokens {
        self.suppressor.compute(filenames)
    }

    /// Builds the context for one season folder: show title, season number
    /// and the duplicate tokens of its files.
    ///
    /// A lone file shares every fragment with itself, so duplicates are only
    /// computed for two or more files.
    pub fn season_context<S: AsRef<str>>(
        &self,
        show: TitleYear,
        season: Option<u32>,
        filenames: &[S],
    ) -> SeasonContext {
        let context = SeasonContext::new(show, season);
        if filenames.len() < 2 {
            return context;
        }
        context.with_duplicates(self.duplicate_tokens(filenames))
    }

    /// Compiles an extractor for repeated use over one season.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::RegexError` if a pattern fails to compile.
    pub fn episode_extractor(&self, context: SeasonContext) -> Result<EpisodeExtractor> {
        EpisodeExtractor::new(context)
    }

    /// Infers episode info for a single file.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::EpisodeNotFound` if no episode number is found.
    ///
    /// # Examples
    /// ```
    /// use kirinuki_core::parser::{Engine, SeasonContext};
    ///
    /// let engine = Engine::with_defaults().unwrap();
    /// let show = engine.title_year("The Expanse", "").unwrap();
    /// let context = SeasonContext::new(show, Some(1));
    /// let info = engine.episode_info("The Expanse S01E09E10.mp4", &context).unwrap();
    ///
    /// assert_eq!(info.numbers, vec![9, 10]);
    /// assert_eq!(info.name, None);
    /// ```
    pub fn episode_info(&self, filename: &str, context: &SeasonContext) -> Result<EpisodeInfo> {
        self.episode_extractor(context.clone())?.extract(filename)
    }
}

/// Convenience function to infer title and year with default settings.
///
/// `original` is the untruncated entry name used for year searches; pass an
/// empty string to reuse `name`.
///
/// # Errors
///
/// Returns `KirinukiError::EmptyInput` if `name` is blank.
pub fn infer_title_year(name: &str, original: &str) -> Result<TitleYear> {
    Engine::with_defaults()?.title_year(name, original)
}

/// Convenience function to infer episode info for one file.
///
/// # Errors
///
/// Returns `KirinukiError::EpisodeNotFound` if no episode number is found.
pub fn infer_episode_info(filename: &str, context: &SeasonContext) -> Result<EpisodeInfo> {
    EpisodeExtractor::new(context.clone())?.extract(filename)
}

/// Convenience function to find a season's duplicate tokens with default
/// settings.
pub fn compute_duplicate_tokens<S: AsRef<str>>(filenames: &[S]) -> DuplicateTokens {
    DuplicateTokenSuppressor::default().compute(filenames)
}
