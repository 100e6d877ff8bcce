//! # Fragment tokenizer
//!
//! Splits filename stems into fragments for duplicate detection. Each
//! delimiter is applied independently to the whole stem, so one stem yields
//! the union (with repeats) of four different splits.

/// Delimiters applied one at a time, in this order.
pub const DELIMITERS: &[char] = &[' ', '.', '_', '-'];

/// Default minimum fragment length, in characters.
pub const MIN_FRAGMENT_LEN: usize = 3;

/// Tokenizer for filename stems.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_len: MIN_FRAGMENT_LEN,
        }
    }
}

impl Tokenizer {
    /// Create a new tokenizer keeping fragments of at least three characters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum fragment length in characters.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Minimum fragment length in characters.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Splits `stem` once per delimiter and returns every long-enough
    /// fragment from every split.
    ///
    /// A fragment that survives more than one split is returned once per
    /// split, so a stem without any `.` shows up whole from that split.
    ///
    /// # Examples
    /// ```
    /// use kirinuki_core::parser::tokenizer::Tokenizer;
    ///
    /// let fragments = Tokenizer::new().fragments("Show.S01E01.Pilot");
    /// assert_eq!(fragments, vec!["Show.S01E01.Pilot", "Show", "S01E01", "Pilot",
    ///     "Show.S01E01.Pilot", "Show.S01E01.Pilot"]);
    /// ```
    pub fn fragments<'a>(&self, stem: &'a str) -> Vec<&'a str> {
        DELIMITERS
            .iter()
            .flat_map(|&delimiter| stem.split(delimiter))
            .filter(|fragment| fragment.chars().count() >= self.min_len)
            .collect()
    }
}
