use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{KirinukiError, Result};
use crate::media::file_stem;
use crate::parser::duplicates::DuplicateTokens;
use crate::parser::rules::{EpisodeMatch, EpisodeRules};
use crate::parser::tags::strip_tags;
use crate::parser::title::INDEXER_CREDIT_PATTERN;
use crate::types::{EpisodeInfo, TitleYear};

/// Characters trimmed from both ends of episode names and part markers.
const NAME_PUNCTUATION: &[char] = &[',', '.', '-', '_', ' '];

/// Everything known about a season before its files are looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonContext {
    /// The show's inferred title and year.
    pub show: TitleYear,
    /// Season number, if known. Unknown seasons skip the `1x01` and `101`
    /// style rules.
    pub season: Option<u32>,
    /// Fragments shared by the season's files.
    pub duplicates: DuplicateTokens,
}

impl SeasonContext {
    /// Creates a context without duplicate tokens.
    #[must_use]
    pub fn new(show: TitleYear, season: Option<u32>) -> Self {
        Self {
            show,
            season,
            duplicates: DuplicateTokens::empty(),
        }
    }

    /// Attaches the season's duplicate tokens.
    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicateTokens) -> Self {
        self.duplicates = duplicates;
        self
    }
}

/// Explicit `Part 2` / `pt.b` marker found in a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PartMarker {
    token: String,
    part: String,
}

/// Extracts episode numbers, title and part marker for one season's files.
pub struct EpisodeExtractor {
    context: SeasonContext,
    rules: EpisodeRules,
    re_raw_title: Option<Regex>,
    re_clean_title: Option<Regex>,
    re_part: Regex,
    re_year_token: Regex,
    re_resolution_block: Regex,
    re_indexer: Regex,
    re_release_tag: Regex,
    re_resolution: Regex,
    re_dot_run: Regex,
    re_comma: Regex,
}

impl EpisodeExtractor {
    /// Compiles the rule table and title patterns for `context`.
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::RegexError` if a pattern fails to compile.
    pub fn new(context: SeasonContext) -> Result<Self> {
        Ok(Self {
            rules: EpisodeRules::new(context.season)?,
            re_raw_title: title_pattern(&context.show.raw_title)?,
            re_clean_title: title_pattern(&context.show.clean_title)?,
            re_part: Regex::new(concat!(
                r"(?i)(?:^|[^a-z0-9])",
                r"(?P<token>(?:parts?|pt)(?P<part>(?:[ .\-_]+[a-z]|[ .\-_]*\d{1,2})(?:-(?:[a-z]|\d{1,2}))?))",
                r"(?:[^a-z0-9]|$)",
            ))?,
            re_year_token: Regex::new(r"[(\[]\d{4}[)\]]")?,
            re_resolution_block: Regex::new(r"(?i)\((?:1080|480|720|2160)p.*\)")?,
            re_indexer: Regex::new(INDEXER_CREDIT_PATTERN)?,
            re_release_tag: Regex::new(concat!(
                r"(?i)(?:^|[\s._\-])",
                r"(?:web[\s._\-]?dl|web[\s._\-]?rip|dvd[\s._\-]?rip|bd[\s._\-]?rip|br[\s._\-]?rip|blu[\s._\-]?ray|hdtv|hdrip)",
                r"(?P<tail>[\s._\-]|$)",
            ))?,
            re_resolution: Regex::new(r"(?i)(?:^|[\s._\-\[(])(?:2160|1080|720|480)p(?:[\s._\-\])]|$)")?,
            re_dot_run: Regex::new(r"\.+(\w+)")?,
            re_comma: Regex::new(r",(\p{L})")?,
            context,
        })
    }

    /// The context this extractor was built for.
    pub fn context(&self) -> &SeasonContext {
        &self.context
    }

    /// Infers episode info for one filename (extension included).
    ///
    /// # Errors
    ///
    /// Returns `KirinukiError::EmptyInput` for blank names and
    /// `KirinukiError::EpisodeNotFound` when no rule finds an episode number.
    pub fn extract(&self, filename: &str) -> Result<EpisodeInfo> {
        if filename.trim().is_empty() {
            return Err(KirinukiError::EmptyInput);
        }

        let Some(episode) = self.rules.first_match(filename) else {
            debug!(filename, "no episode rule matched");
            return Err(KirinukiError::EpisodeNotFound {
                filename: filename.to_string(),
            });
        };
        debug!(
            filename,
            rule = %episode.rule,
            token = %episode.token,
            start = episode.start,
            end = ?episode.end,
            "episode rule matched"
        );

        let marker = self.find_part_marker(filename);
        let name = self.derive_name(filename, &episode, marker.as_ref());
        let part = marker
            .map(|m| m.part)
            .or(episode.part)
            .as_deref()
            .and_then(normalize_part);

        let mut info = EpisodeInfo::from_range(episode.start, episode.end);
        info.name = name;
        info.parts = part;

        trace!(filename, ?info, "episode inferred");
        Ok(info)
    }

    fn find_part_marker(&self, filename: &str) -> Option<PartMarker> {
        self.re_part.captures(filename).map(|c| PartMarker {
            token: c["token"].to_string(),
            part: c["part"].to_string(),
        })
    }

    /// Runs the name pipeline. Each stage takes the previous stage's output.
    fn derive_name(
        &self,
        filename: &str,
        episode: &EpisodeMatch,
        marker: Option<&PartMarker>,
    ) -> Option<String> {
        let name = self.remove_show_titles(file_stem(filename));
        let name = strip_tags(&name).trim().to_string();
        let name = remove_episode_token(&name, episode);
        let name = match marker {
            Some(marker) => name.replacen(&marker.token, "", 1),
            None => name,
        };
        let name = self.remove_release_noise(&name);
        let name = self.truncate_at_resolution(&name).to_string();
        let name = self.context.duplicates.strip_from(&name);
        let name = self.collapse_scene_dots(&name);
        let name = self.re_comma.replace_all(&name, ", ${1}");
        let name = name.trim_matches(NAME_PUNCTUATION);

        (!name.is_empty()).then(|| name.to_string())
    }

    fn remove_show_titles(&self, stem: &str) -> String {
        [&self.re_raw_title, &self.re_clean_title]
            .into_iter()
            .flatten()
            .fold(stem.to_string(), |acc, re| re.replacen(&acc, 1, "").into_owned())
    }

    /// Drops the year, resolution block, indexer credit and release tag, each
    /// at most once.
    fn remove_release_noise(&self, name: &str) -> String {
        let name = self.re_year_token.replacen(name, 1, "");
        let name = match self.context.show.year {
            Some(year) => remove_delimited(&name, &year.to_string()),
            None => name.into_owned(),
        };
        let name = self.re_resolution_block.replacen(&name, 1, "");
        let name = self.re_indexer.replacen(&name, 1, "");
        self.re_release_tag.replacen(&name, 1, "${tail}").into_owned()
    }

    fn truncate_at_resolution<'a>(&self, name: &'a str) -> &'a str {
        match self.re_resolution.find(name) {
            Some(m) => &name[..m.start()],
            None => name,
        }
    }

    /// Scene names (`Title.With.Dots`) read better with spaces. Names that
    /// already contain spaces keep their dots (`Mr. Monk`).
    fn collapse_scene_dots(&self, name: &str) -> String {
        if name.contains(' ') {
            return name.to_string();
        }
        self.re_dot_run.replace_all(name, " ${1}").into_owned()
    }
}

/// Case-insensitive literal pattern for a show title; `None` for blank titles.
fn title_pattern(title: &str) -> Result<Option<Regex>> {
    if title.trim().is_empty() {
        return Ok(None);
    }
    let re = RegexBuilder::new(&regex::escape(title))
        .case_insensitive(true)
        .build()?;
    Ok(Some(re))
}

/// Cuts the episode token out of `name`.
///
/// Purely numeric tokens (`08`, `154`) are only removed where they stand on
/// their own, never from inside a longer number or word.
fn remove_episode_token(name: &str, episode: &EpisodeMatch) -> String {
    if episode.is_numeric_token() {
        remove_delimited(name, &episode.token)
    } else {
        name.replacen(&episode.token, "", 1)
    }
}

/// Removes the first occurrence of `token` that has no alphanumeric
/// neighbour on either side.
fn remove_delimited(text: &str, token: &str) -> String {
    for (pos, _) in text.match_indices(token) {
        let end = pos + token.len();
        let before = text[..pos].chars().next_back();
        let after = text[end..].chars().next();
        if !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        {
            return format!("{}{}", &text[..pos], &text[end..]);
        }
    }
    text.to_string()
}

/// Keeps a part marker only if it is all letters or all digits.
fn normalize_part(part: &str) -> Option<String> {
    let part = part.trim_matches(NAME_PUNCTUATION);
    if part.is_empty() {
        return None;
    }
    let alphabetic = part.chars().all(char::is_alphabetic);
    let numeric = part.chars().all(|c| c.is_ascii_digit());
    (alphabetic || numeric).then(|| part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::title::TitleYearExtractor;

    /// Infers the show from its folder name, then the episode.
    fn infer(show_folder: &str, filename: &str, season: Option<u32>) -> Result<EpisodeInfo> {
        let show = TitleYearExtractor::new()
            .unwrap()
            .extract(show_folder, show_folder);
        EpisodeExtractor::new(SeasonContext::new(show, season))
            .unwrap()
            .extract(filename)
    }

    fn check(
        show_folder: &str,
        filename: &str,
        season: Option<u32>,
        numbers: &[u32],
        name: Option<&str>,
        parts: Option<&str>,
    ) {
        let info = infer(show_folder, filename, season).unwrap();
        assert_eq!(info.numbers, numbers, "numbers for {filename:?}");
        assert_eq!(info.name.as_deref(), name, "name for {filename:?}");
        assert_eq!(info.parts.as_deref(), parts, "parts for {filename:?}");
    }

    #[test]
    fn season_cross_with_title() {
        check(
            "The Suite Life of Zack and Cody",
            "The Suite Life of Zack and Cody - 1x01 - Hotel Hangout.mkv",
            Some(1),
            &[1],
            Some("Hotel Hangout"),
            None,
        );
    }

    #[test]
    fn title_removal_ignores_case() {
        check(
            "The Suite Life of Zack and Cody",
            "The Suite Life Of Zack and Cody- 1x16- Big hair and Baseball.mkv",
            Some(1),
            &[16],
            Some("Big hair and Baseball"),
            None,
        );
    }

    #[test]
    fn bare_number_between_tags() {
        check(
            "[Erai-raws] Death Note [1080p][Multiple Subtitle][BCE68CE7]",
            "[Erai-raws] Death Note - 01 [1080p][Multiple Subtitle][BCE68CE7].mkv",
            Some(0),
            &[1],
            None,
            None,
        );
    }

    #[test]
    fn verbose_episode_keeps_numeric_title() {
        check(
            "Death Note",
            "Death Note - Episode 01 - 1,28 1080p Hybrid ITA BDRip DTS-HD-MA 2.0 Kira [SEV].mkv",
            Some(0),
            &[1],
            Some("1,28"),
            None,
        );
    }

    #[test]
    fn parenthesized_release_notes_are_dropped() {
        check(
            "Malcolm in the Middle (2000) (1080p AMZN WEB-DL x265 Silence)",
            "Malcolm in the Middle (2000) - S07E22 - Graduation (1080p AMZN WEB-DL x265 Silence).mkv",
            Some(7),
            &[22],
            Some("Graduation"),
            None,
        );
    }

    #[test]
    fn season_episode_without_title() {
        check("Test Show", "Test Show S01E01.mkv", Some(1), &[1], None, None);
    }

    #[test]
    fn season_episode_with_title() {
        check(
            "Test Show",
            "Test Show S01E01 Episode Name.mkv",
            Some(1),
            &[1],
            Some("Episode Name"),
            None,
        );
        check(
            "Test Show (2025)",
            "Test Show (2025) S01E01 Episode Name.mkv",
            Some(1),
            &[1],
            Some("Episode Name"),
            None,
        );
        check(
            "Test Show (2025)",
            "Test Show (2025) - S01E01 - Episode Name.mkv",
            Some(1),
            &[1],
            Some("Episode Name"),
            None,
        );
    }

    #[test]
    fn explicit_show_context() {
        let show = TitleYear::new("Test Show (2025)", "Test Show (2025)", Some(2025));
        let info = EpisodeExtractor::new(SeasonContext::new(show, Some(1)))
            .unwrap()
            .extract("Test Show (2025) - S01E01 - Episode Name.mkv")
            .unwrap();
        assert_eq!(info.numbers, vec![1]);
        assert_eq!(info.name.as_deref(), Some("Episode Name"));
        assert_eq!(info.parts, None);
    }

    #[test]
    fn ep_prefix_with_version_suffix() {
        check(
            "[Exiled-Destiny]_Maid-Sama!",
            "[Exiled-Destiny]_Maid-Sama!_Ep16v2_(A46BDC49).mkv",
            Some(0),
            &[16],
            Some("v2_(A46BDC49)"),
            None,
        );
    }

    #[test]
    fn bare_number_before_release_tags() {
        check(
            "One-Punch Man",
            "One-Punch Man - 08 [BDRip 1080p AVC][FLAC].mkv",
            Some(1),
            &[8],
            None,
            None,
        );
        check(
            "[AC] Kamisama Kiss",
            "[AC] Kamisama Kiss - 04 [BD][1080p-Hi10][FLAC][Dual-Audio][1231231].mkv",
            Some(1),
            &[4],
            None,
            None,
        );
    }

    #[test]
    fn filename_without_show_name() {
        check(
            "Invincible",
            "S01E01-I'm Used to It [28559867].mkv",
            Some(1),
            &[1],
            Some("I'm Used to It"),
            None,
        );
        check(
            "NCIS (1234)",
            "NCIS S01E01 Yankee White.mkv",
            Some(1),
            &[1],
            Some("Yankee White"),
            None,
        );
    }

    #[test]
    fn season_concatenated_number() {
        check(
            "Naruto Shippuden",
            "[Koten_Gars] Naruto Shippuden - 154 [iTunes][h.264][1080p][AC3] [A5D2B724].mkv",
            Some(1),
            &[54],
            None,
            None,
        );
    }

    #[test]
    fn show_year_in_folder_and_file() {
        check(
            "Invincible (2021)",
            "Invincible (2021) - S01E02 - Here Goes Nothing (1080p WEB-DL x265 SAMPA).mkv",
            Some(1),
            &[2],
            Some("Here Goes Nothing"),
            None,
        );
    }

    #[test]
    fn inline_part_letters() {
        let title = "Squidward's School for Grown Ups + Oral Report";
        check(
            "SpongeBob SquarePants",
            "SpongeBob SquarePants S08E05ab - Squidward's School for Grown Ups + Oral Report (1080p AMZN Webrip x265 10bit EAC3 2.0 - Frys) [TAoE].mkv",
            Some(8),
            &[5],
            Some(title),
            Some("ab"),
        );
        check(
            "SpongeBob SquarePants",
            "SpongeBob SquarePants S08E05a - Squidward's School for Grown Ups + Oral Report (1080p AMZN Webrip x265 10bit EAC3 2.0 - Frys) [TAoE].mkv",
            Some(8),
            &[5],
            Some(title),
            Some("a"),
        );
    }

    #[test]
    fn show_name_after_episode_title() {
        check(
            "A Mickey Mouse Cartoon",
            "S01E01. No Service - A Mickey Mouse Cartoon.mp4",
            Some(1),
            &[1],
            Some("No Service"),
            None,
        );
    }

    #[test]
    fn chained_episodes() {
        check("The Expanse", "The Expanse S01E09E10.mp4", Some(1), &[9, 10], None, None);
    }

    #[test]
    fn unknown_season() {
        check("The Office", "E11 Night Out.mp4", None, &[11], Some("Night Out"), None);
    }

    #[test]
    fn scene_dots_and_comma_repair() {
        check(
            "Gilmore.Girls",
            "Gilmore.Girls.S02E13.A-Tisket,.A-Tasket.1080p.WEB-DL.x265.10bit.HEVC-MONOLITH.mkv",
            Some(2),
            &[13],
            Some("A-Tisket, A-Tasket"),
            None,
        );
    }

    #[test]
    fn comma_repair_inserts_missing_space() {
        check(
            "Show",
            "Show - S01E01 - A-Tisket,A-Tasket.mkv",
            Some(1),
            &[1],
            Some("A-Tisket, A-Tasket"),
            None,
        );
    }

    #[test]
    fn explicit_part_marker_overrides_inline_letters() {
        check(
            "Show",
            "Show S01E05a - The Finale Part 2.mkv",
            Some(1),
            &[5],
            Some("The Finale"),
            Some("2"),
        );
        check("Show", "Show S01E06 - Pt.b.mkv", Some(1), &[6], None, Some("b"));
    }

    #[test]
    fn part_marker_range_is_discarded() {
        check("Show", "Show S01E07 - Part 1-2.mkv", Some(1), &[7], None, None);
    }

    #[test]
    fn part_keyword_inside_words_is_ignored() {
        check(
            "Show",
            "Show S01E08 - Party Captain.mkv",
            Some(1),
            &[8],
            Some("Party Captain"),
            None,
        );
    }

    #[test]
    fn scene_title_with_resolution_truncation() {
        check(
            "Some.Show",
            "Some.Show.S03E04.The.Long.Night.720p.HDTV.x264-GRP.mkv",
            Some(3),
            &[4],
            Some("The Long Night"),
            None,
        );
    }

    #[test]
    fn version_suffix_after_season_episode() {
        check("Show", "Show - S01E01v2 - Pilot.mkv", Some(1), &[1], Some("Pilot"), None);
    }

    #[test]
    fn indexer_credit_and_release_tag_without_resolution() {
        check(
            "Show",
            "www.Site.org - Show - S01E02 - Title WEBRip x264.mkv",
            Some(1),
            &[2],
            Some("Title x264"),
            None,
        );
        check("Show", "Show - S01E03 - Title.HDTV.mkv", Some(1), &[3], Some("Title"), None);
    }

    #[test]
    fn duplicate_tokens_are_stripped() {
        let show = TitleYear::new("Show", "Show", None);
        let context = SeasonContext::new(show, Some(1))
            .with_duplicates(DuplicateTokens::new(["GroupTag"]));
        let info = EpisodeExtractor::new(context)
            .unwrap()
            .extract("Show - 03 - Title GroupTag.mkv")
            .unwrap();
        assert_eq!(info.numbers, vec![3]);
        assert_eq!(info.name.as_deref(), Some("Title"));
    }

    #[test]
    fn numeric_token_only_removed_where_delimited() {
        check("Show", "Route 207 - 07.mkv", Some(1), &[7], Some("Route 207"), None);
    }

    #[test]
    fn no_digits_is_not_inferable() {
        let err = infer("Random", "Random File.mkv", Some(1)).unwrap_err();
        assert!(matches!(err, KirinukiError::EpisodeNotFound { .. }));
        assert!(err.is_not_inferable());
    }

    #[test]
    fn blank_filename_errors() {
        assert!(matches!(infer("Show", "  ", Some(1)), Err(KirinukiError::EmptyInput)));
    }

    #[test]
    fn part_normalization() {
        assert_eq!(normalize_part("ab"), Some("ab".into()));
        assert_eq!(normalize_part(" .2"), Some("2".into()));
        assert_eq!(normalize_part("-b"), Some("b".into()));
        assert_eq!(normalize_part("1-2"), None);
        assert_eq!(normalize_part("a1"), None);
        assert_eq!(normalize_part(" - "), None);
    }

    #[test]
    fn delimited_removal() {
        assert_eq!(remove_delimited("- 154", "154"), "- ");
        assert_eq!(remove_delimited("1154 - 154", "154"), "1154 - ");
        assert_eq!(remove_delimited("abc154", "154"), "abc154");
    }
}
