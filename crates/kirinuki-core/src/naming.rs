//! Canonical names for library entries.
//!
//! Shows and movies become `Name (Year)`, season folders `Season 01`, and
//! episodes `Name (Year) S01E09-E10 - Episode Title`.

use crate::types::EpisodeInfo;

/// Canonical season folder name, e.g. `Season 01`.
#[must_use]
pub fn season_folder_name(season: u32) -> String {
    format!("Season {season:02}")
}

/// Canonical episode file stem (no extension).
///
/// The title segment is left out when the episode has no name, and a
/// `-pt<part>` suffix is added when a part marker was found.
///
/// # Examples
/// ```
/// use kirinuki_core::naming::episode_stem;
/// use kirinuki_core::EpisodeInfo;
///
/// let mut info = EpisodeInfo::from_range(9, Some(10));
/// assert_eq!(episode_stem("The Expanse (2015)", 1, &info), "The Expanse (2015) S01E09-E10");
///
/// info.name = Some("Critical Mass".to_string());
/// assert_eq!(
///     episode_stem("The Expanse (2015)", 1, &info),
///     "The Expanse (2015) S01E09-E10 - Critical Mass"
/// );
/// ```
#[must_use]
pub fn episode_stem(show_stem: &str, season: u32, info: &EpisodeInfo) -> String {
    let mut stem = format!("{show_stem} {}", info.code(season));
    if let Some(name) = info.name.as_deref().filter(|n| !n.is_empty()) {
        stem.push_str(" - ");
        stem.push_str(name);
    }
    if let Some(part) = &info.parts {
        stem.push_str("-pt");
        stem.push_str(part);
    }
    stem
}
