//! Classification helpers over directory listings: extension tables, input
//! type detection, season folder numbering and primary-file selection.
//!
//! Nothing here touches the filesystem. Callers hand in names (and a
//! directory flag) read from whatever listing they own.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{KirinukiError, Result};
use crate::parser::TitleYearExtractor;
use crate::types::{InputType, MediaEntry};

/// Extensions treated as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "webm", "vob", "ogv", "avi", "mov", "m4p", "m4v", "mpg", "mpv",
];

/// Extensions treated as subtitle files.
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub"];

static RE_SEASON_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])(?:season|s)[\s._\-]*(\d{1,3})(?:\D|$)")
        .expect("static season pattern is valid")
});

static RE_FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,2})(?:\D|$)").expect("static number pattern is valid")
});

/// Subtitle flags that may sit between the stem and the extension.
const SUBTITLE_FLAGS: &[&str] = &["forced", "sdh", "default"];

/// Final extension of a file name, without the dot.
///
/// Leading-dot names (`.hidden`), trailing dots and "extensions" that
/// contain whitespace (`Mr. Robot`) are not extensions.
pub fn extension(name: &str) -> Option<&str> {
    let pos = name.rfind('.')?;
    let ext = &name[pos + 1..];
    (pos > 0 && !ext.is_empty() && !ext.contains(char::is_whitespace)).then_some(ext)
}

/// File name with its final extension removed.
pub fn file_stem(name: &str) -> &str {
    match extension(name) {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    }
}

/// Splits a file name into the stem used for inference and the suffix to
/// keep when renaming.
///
/// Subtitles keep their language and flag qualifiers, so
/// `Movie.2006.en.forced.srt` splits into `Movie.2006` and `.en.forced.srt`.
/// Every other file keeps only its final extension.
pub fn split_media_suffix(name: &str) -> (&str, &str) {
    let mut stem = file_stem(name);
    if is_subtitle(name) {
        while let Some(qualifier) = extension(stem).filter(|q| is_subtitle_qualifier(q)) {
            stem = &stem[..stem.len() - qualifier.len() - 1];
        }
    }
    (stem, &name[stem.len()..])
}

/// Two or three letter lowercase language codes, or a known flag.
fn is_subtitle_qualifier(qualifier: &str) -> bool {
    let language =
        (2..=3).contains(&qualifier.len()) && qualifier.chars().all(|c| c.is_ascii_lowercase());
    language || SUBTITLE_FLAGS.iter().any(|flag| flag.eq_ignore_ascii_case(qualifier))
}

fn has_extension(name: &str, table: &[&str]) -> bool {
    extension(name).is_some_and(|ext| table.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Returns `true` for names with a video extension.
pub fn is_video(name: &str) -> bool {
    has_extension(name, VIDEO_EXTENSIONS)
}

/// Returns `true` for names with a subtitle extension.
pub fn is_subtitle(name: &str) -> bool {
    has_extension(name, SUBTITLE_EXTENSIONS)
}

/// Returns `true` if a directory name looks like a season folder.
pub fn is_season_folder(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper.contains("SEASON") || upper.contains("S0")
}

/// Decides what the workflow was pointed at.
///
/// `entries` is the directory listing when `is_file` is false and is
/// ignored otherwise.
///
/// # Errors
///
/// `UnknownExtension` for a standalone non-video file, `Unclassifiable` for a
/// directory without season folders or video files.
pub fn classify_input(name: &str, is_file: bool, entries: &[MediaEntry]) -> Result<InputType> {
    if is_file {
        if is_video(name) {
            return Ok(InputType::MovieWithoutFolder);
        }
        return Err(KirinukiError::UnknownExtension { name: name.into() });
    }

    let input_type = if entries.iter().any(|e| e.is_dir && is_season_folder(&e.name)) {
        InputType::ShowWithSeasons
    } else if entries.iter().any(|e| !e.is_dir && is_video(&e.name)) {
        InputType::MovieInFolder
    } else {
        return Err(KirinukiError::Unclassifiable { name: name.into() });
    };

    debug!(name, %input_type, "input classified");
    Ok(input_type)
}

/// Season number of a season folder such as `Season 2`, `S03` or
/// `Staffel 4`. Without a season label, the first standalone one or two
/// digit number is used.
pub fn season_number(folder: &str) -> Option<u32> {
    RE_SEASON_LABEL
        .captures(folder)
        .and_then(|c| c[1].parse().ok())
        .or_else(|| {
            RE_FIRST_NUMBER
                .captures(folder)
                .and_then(|c| c[1].parse().ok())
        })
}

/// Files that are neither video nor subtitles. The workflow offers these
/// for removal.
pub fn extra_files(entries: &[MediaEntry]) -> Vec<&MediaEntry> {
    entries
        .iter()
        .filter(|e| !e.is_dir && !is_video(&e.name) && !is_subtitle(&e.name))
        .collect()
}

/// Picks the main file among `candidates`.
///
/// A single candidate wins outright. Otherwise the first candidate whose
/// inferred clean title equals `title` (ignoring case) is chosen, which
/// skips sample clips and uploader messages shipped next to the movie.
pub fn primary_file<'a, S: AsRef<str>>(
    candidates: &'a [S],
    title: &str,
    extractor: &TitleYearExtractor,
) -> Option<&'a str> {
    if let [only] = candidates {
        return Some(only.as_ref());
    }

    let wanted = title.to_uppercase();
    candidates.iter().map(AsRef::as_ref).find(|name| {
        let inferred = extractor.extract(split_media_suffix(name).0, name);
        inferred.clean_title.to_uppercase() == wanted
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_and_extension() {
        assert_eq!(extension("movie.mkv"), Some("mkv"));
        assert_eq!(file_stem("movie.mkv"), "movie");
        assert_eq!(file_stem("Show.S01E01.Pilot.720p.mkv"), "Show.S01E01.Pilot.720p");
        assert_eq!(extension("movie.en.srt"), Some("srt"));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension(".hidden"), None);
        assert_eq!(extension("trailing."), None);
        assert_eq!(file_stem("Mr. Robot"), "Mr. Robot");
    }

    #[test]
    fn video_and_subtitle_detection() {
        assert!(is_video("a.mkv"));
        assert!(is_video("a.MP4"));
        assert!(!is_video("a.srt"));
        assert!(is_subtitle("a.en.srt"));
        assert!(!is_subtitle("a.txt"));
    }

    #[test]
    fn classify_standalone_movie() {
        for name in ["test.mp4", "movie.MKV"] {
            assert_eq!(
                classify_input(name, true, &[]).unwrap(),
                InputType::MovieWithoutFolder
            );
        }
    }

    #[test]
    fn classify_unknown_file_errors() {
        assert!(matches!(
            classify_input("notes.txt", true, &[]),
            Err(KirinukiError::UnknownExtension { .. })
        ));
    }

    #[test]
    fn classify_movie_folder() {
        let entries = vec![
            MediaEntry::file("movie.mkv"),
            MediaEntry::file("movie.srt"),
            MediaEntry::file("other.txt"),
            MediaEntry::dir("other"),
        ];
        assert_eq!(classify_input("movie", false, &entries).unwrap(), InputType::MovieInFolder);
    }

    #[test]
    fn classify_show_folder() {
        let entries = vec![
            MediaEntry::dir("Season 1"),
            MediaEntry::dir("Season 02"),
            MediaEntry::file("balls.txt"),
        ];
        assert_eq!(classify_input("show", false, &entries).unwrap(), InputType::ShowWithSeasons);
    }

    #[test]
    fn classify_empty_folder_errors() {
        let entries = vec![MediaEntry::file("readme.txt")];
        assert!(matches!(
            classify_input("stuff", false, &entries),
            Err(KirinukiError::Unclassifiable { .. })
        ));
    }

    #[test]
    fn season_numbers() {
        assert_eq!(season_number("Season 1"), Some(1));
        assert_eq!(season_number("Season 02"), Some(2));
        assert_eq!(season_number("season.10"), Some(10));
        assert_eq!(season_number("S03"), Some(3));
        assert_eq!(season_number("Show S04 1080p"), Some(4));
        assert_eq!(season_number("Staffel 4"), Some(4));
        assert_eq!(season_number("Specials"), None);
    }

    #[test]
    fn season_number_fallback_needs_a_short_standalone_number() {
        assert_eq!(season_number("Staffel 12"), Some(12));
        assert_eq!(season_number("Temporada 105"), None);
        assert_eq!(season_number("Extras 2160p"), None);
    }

    #[test]
    fn subtitle_qualifiers_stay_in_the_suffix() {
        assert_eq!(
            split_media_suffix("Nacho.Libre.2006.en.srt"),
            ("Nacho.Libre.2006", ".en.srt")
        );
        assert_eq!(
            split_media_suffix("Test Show S01E01.eng.forced.srt"),
            ("Test Show S01E01", ".eng.forced.srt")
        );
        assert_eq!(split_media_suffix("Movie.2006.srt"), ("Movie.2006", ".srt"));
        assert_eq!(split_media_suffix("Show.S01E01.Pilot.srt"), ("Show.S01E01.Pilot", ".srt"));
    }

    #[test]
    fn non_subtitles_keep_only_the_final_extension() {
        assert_eq!(split_media_suffix("Show.S01E01.en.mkv"), ("Show.S01E01.en", ".mkv"));
        assert_eq!(split_media_suffix("noext"), ("noext", ""));
    }

    #[test]
    fn extra_files_skip_media_and_dirs() {
        let entries = vec![
            MediaEntry::file("ep1.mkv"),
            MediaEntry::file("ep1.srt"),
            MediaEntry::file("RARBG.txt"),
            MediaEntry::file("cover.jpg"),
            MediaEntry::dir("Subs"),
        ];
        let extras: Vec<_> = extra_files(&entries).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(extras, vec!["RARBG.txt", "cover.jpg"]);
    }

    #[test]
    fn primary_file_by_title() {
        let extractor = TitleYearExtractor::new().unwrap();
        let candidates = vec![
            "Sample.mkv".to_string(),
            "Nacho.Libre.2006.1080p.WEB-DL.mkv".to_string(),
        ];
        assert_eq!(
            primary_file(&candidates, "nacho libre", &extractor),
            Some("Nacho.Libre.2006.1080p.WEB-DL.mkv")
        );
        assert_eq!(primary_file(&candidates, "Other Movie", &extractor), None);
        assert_eq!(primary_file(&["only.mkv"], "anything", &extractor), Some("only.mkv"));

        let subtitles = ["Sample.srt", "Nacho Libre.en.srt"];
        assert_eq!(
            primary_file(&subtitles, "Nacho Libre", &extractor),
            Some("Nacho Libre.en.srt")
        );
    }
}
