//! # Episode number rules
//!
//! Ordered rule table for locating the episode number in a filename. Rules
//! are tried in priority order and the first one that matches wins, so a
//! weak rule (a bare two-digit number) only fires when every stronger rule
//! failed.
//!
//! Every pattern names the same groups: `token` (the text to cut out of the
//! episode name, without surrounding delimiters), `start`, and optionally
//! `end` and `part`.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifies one rule of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeRuleKind {
    /// `Episode 01`, `episode.3-4`
    Verbose,
    /// `S01E01`, `E11`, `S01E09E10`, `S08E05ab`, `S01E01v2`
    SeasonEpisode,
    /// `Ep16`
    Ep,
    /// `1x01` for season 1
    SeasonCross,
    /// `154` for season 1, episode 54
    SeasonConcat,
    /// `- 08 -`
    Bare,
}

impl EpisodeRuleKind {
    /// Whether the rule needs a known season number.
    #[must_use]
    pub fn needs_season(self) -> bool {
        matches!(self, Self::SeasonCross | Self::SeasonConcat)
    }
}

impl fmt::Display for EpisodeRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verbose => write!(f, "verbose"),
            Self::SeasonEpisode => write!(f, "season-episode"),
            Self::Ep => write!(f, "ep"),
            Self::SeasonCross => write!(f, "season-cross"),
            Self::SeasonConcat => write!(f, "season-concat"),
            Self::Bare => write!(f, "bare"),
        }
    }
}

/// What a rule captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMatch {
    /// The rule that produced the match.
    pub rule: EpisodeRuleKind,
    /// Matched text without boundary delimiters, e.g. `S01E09E10` or `154`.
    pub token: String,
    /// First episode number.
    pub start: u32,
    /// Last episode number of a range.
    pub end: Option<u32>,
    /// Inline part letters such as `ab` in `S08E05ab`.
    pub part: Option<String>,
}

impl EpisodeMatch {
    /// Returns `true` if the token is made of ASCII digits only.
    #[must_use]
    pub fn is_numeric_token(&self) -> bool {
        !self.token.is_empty() && self.token.bytes().all(|b| b.is_ascii_digit())
    }
}

/// One compiled rule.
#[derive(Debug, Clone)]
pub struct EpisodeRule {
    kind: EpisodeRuleKind,
    pattern: Regex,
}

impl EpisodeRule {
    /// Compiles the rule for `season`. Returns `None` for season-dependent
    /// rules when the season is unknown.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::RegexError` if the pattern fails to compile.
    pub fn new(kind: EpisodeRuleKind, season: Option<u32>) -> Result<Option<Self>> {
        let pattern = match (kind, season) {
            (EpisodeRuleKind::Verbose, _) => {
                r"(?i)(?P<token>episode[ .\-]?(?P<start>\d{1,4})(?:-(?P<end>\d{1,4}))?)".to_string()
            }
            (EpisodeRuleKind::SeasonEpisode, _) => concat!(
                r"(?i)(?:^|[^a-z0-9])",
                r"(?P<token>(?:s\d{1,2})?e(?P<start>\d{1,3})(?:-?e(?P<end>\d{1,3}))*(?P<part>[a-d]{1,4})?(?:v\d{1,2})?)",
                r"(?:[^a-z0-9]|$)",
            )
            .to_string(),
            (EpisodeRuleKind::Ep, _) => r"(?i)(?P<token>ep(?P<start>\d{1,3}))".to_string(),
            (EpisodeRuleKind::SeasonCross, Some(season)) => format!(
                r"(?i)(?:^|[^0-9])(?P<token>0*{season}x(?P<start>\d{{1,3}}))(?:[\s.\-_,\[(]|$)"
            ),
            (EpisodeRuleKind::SeasonConcat, Some(season)) => {
                format!(r"(?:^|[\s.])(?P<token>{season}(?P<start>\d{{2,3}}))(?:[\s._\-]|$)")
            }
            (EpisodeRuleKind::Bare, _) => {
                r"(?:^|[\s._\-])(?P<token>(?P<start>\d{1,2}))(?:[\s._\-]|$)".to_string()
            }
            (EpisodeRuleKind::SeasonCross | EpisodeRuleKind::SeasonConcat, None) => {
                return Ok(None);
            }
        };

        Ok(Some(Self {
            kind,
            pattern: Regex::new(&pattern)?,
        }))
    }

    /// The rule's kind.
    #[must_use]
    pub fn kind(&self) -> EpisodeRuleKind {
        self.kind
    }

    /// Applies the rule to the leftmost candidate in `filename`.
    pub fn apply(&self, filename: &str) -> Option<EpisodeMatch> {
        let caps = self.pattern.captures(filename)?;

        Some(EpisodeMatch {
            rule: self.kind,
            token: caps.name("token")?.as_str().to_string(),
            start: caps.name("start")?.as_str().parse().ok()?,
            end: caps.name("end").and_then(|m| m.as_str().parse().ok()),
            part: caps.name("part").map(|m| m.as_str().to_string()),
        })
    }
}

/// The ordered rule table for one season.
#[derive(Debug, Clone)]
pub struct EpisodeRules {
    rules: Vec<EpisodeRule>,
}

impl EpisodeRules {
    /// Priority order, strongest first.
    pub const ORDER: [EpisodeRuleKind; 6] = [
        EpisodeRuleKind::Verbose,
        EpisodeRuleKind::SeasonEpisode,
        EpisodeRuleKind::Ep,
        EpisodeRuleKind::SeasonCross,
        EpisodeRuleKind::SeasonConcat,
        EpisodeRuleKind::Bare,
    ];

    /// Compiles the table for `season`. Without a season the two
    /// season-dependent rules are left out.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::RegexError` if any pattern fails to compile.
    pub fn new(season: Option<u32>) -> Result<Self> {
        let mut rules = Vec::with_capacity(Self::ORDER.len());
        for kind in Self::ORDER {
            if let Some(rule) = EpisodeRule::new(kind, season)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    /// First match in priority order.
    pub fn first_match(&self, filename: &str) -> Option<EpisodeMatch> {
        self.rules.iter().find_map(|rule| rule.apply(filename))
    }

    /// Iterates the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &EpisodeRule> {
        self.rules.iter()
    }
}
