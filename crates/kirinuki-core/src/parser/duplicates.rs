use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::media::file_stem;
use crate::parser::tokenizer::Tokenizer;

/// Default share of files a fragment must appear in to count as noise.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.9;

/// Fragments that recur across (nearly) every file of a season, such as
/// group tags or the show name, and are stripped from episode titles.
///
/// Stored longest-first, then lexicographically, so overlapping tokens are
/// removed in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTokens {
    tokens: Vec<String>,
}

impl DuplicateTokens {
    /// Builds a token set from any list of strings. Duplicates and empty
    /// strings are dropped.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = tokens
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.is_empty())
            .collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();
        Self { tokens }
    }

    /// An empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns `true` if `token` is in the set.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Iterates the tokens in removal order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Removes every occurrence of every token from `text`.
    #[must_use]
    pub fn strip_from(&self, text: &str) -> String {
        self.tokens
            .iter()
            .fold(text.to_string(), |acc, token| acc.replace(token.as_str(), ""))
    }
}

/// Finds the fragments shared by a season's filenames.
#[derive(Debug, Clone)]
pub struct DuplicateTokenSuppressor {
    tokenizer: Tokenizer,
    threshold: f64,
}

impl Default for DuplicateTokenSuppressor {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_THRESHOLD, Tokenizer::new())
    }
}

impl DuplicateTokenSuppressor {
    /// Create a suppressor with an explicit threshold (clamped to `[0, 1]`)
    /// and tokenizer.
    pub fn new(threshold: f64, tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// The share of files a fragment must reach.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scans a season's filenames (files only, extensions included).
    ///
    /// A fragment is counted once per occurrence in each delimiter split, so
    /// a fragment that survives several splits of the same file counts more
    /// than once for that file. It is a duplicate when
    /// `count / file_count >= threshold`.
    ///
    /// # Examples
    /// ```
    /// use kirinuki_core::parser::DuplicateTokenSuppressor;
    ///
    /// let files = ["[Grp] Show - 01.mkv", "[Grp] Show - 02.mkv"];
    /// let tokens = DuplicateTokenSuppressor::default().compute(&files);
    /// assert!(tokens.contains("[Grp]"));
    /// ```
    pub fn compute<S: AsRef<str>>(&self, filenames: &[S]) -> DuplicateTokens {
        let file_count = filenames.len();
        if file_count == 0 {
            return DuplicateTokens::empty();
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for filename in filenames {
            let stem = file_stem(filename.as_ref());
            for fragment in self.tokenizer.fragments(stem) {
                *counts.entry(fragment).or_default() += 1;
            }
        }

        let duplicates = DuplicateTokens::new(
            counts
                .into_iter()
                .filter(|&(_, count)| count as f64 / file_count as f64 >= self.threshold)
                .map(|(token, count)| {
                    trace!(token, count, "duplicate token");
                    token
                }),
        );

        debug!(files = file_count, duplicates = duplicates.len(), "duplicate tokens computed");
        duplicates
    }
}
