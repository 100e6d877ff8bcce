//! Dry-run rename plans for a movie file, a movie folder or a show folder.
//!
//! The plan only reads the directory tree. Each step's paths assume every
//! earlier step has been applied.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use kirinuki_core::media::{
    classify_input, extension, extra_files, file_stem, is_season_folder, is_subtitle, is_video,
    primary_file, season_number, split_media_suffix,
};
use kirinuki_core::naming::{episode_stem, season_folder_name};
use kirinuki_core::{Engine, InputType, MediaEntry, TitleYear};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One filesystem change the layout needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanStep {
    CreateDir { path: PathBuf },
    Rename { from: PathBuf, to: PathBuf },
    Purge { path: PathBuf },
    Skip { path: PathBuf, reason: String },
}

pub struct Planner<'a> {
    engine: &'a Engine,
}

impl<'a> Planner<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    pub fn plan(&self, path: &Path) -> Result<Vec<PlanStep>> {
        let name = entry_name(path)?;
        let is_file = path.is_file();
        if !is_file && !path.is_dir() {
            bail!("no file or folder at {}", path.display());
        }

        let entries = if is_file { Vec::new() } else { list_entries(path)? };
        let input_type = classify_input(&name, is_file, &entries)?;
        info!(%input_type, path = %path.display(), "planning");

        let stem = if is_file { file_stem(&name) } else { name.as_str() };
        let title = self.engine.title_year(stem, &name)?;
        debug!(canonical = %title.canonical_stem(), "title inferred");

        match input_type {
            InputType::MovieWithoutFolder => Ok(self.plan_loose_movie(path, &name, &title)),
            InputType::MovieInFolder => self.plan_movie_folder(path, &entries, &title),
            InputType::ShowWithSeasons => self.plan_show(path, &entries, &title),
        }
    }

    /// Moves the file into a new `Name (Year)` folder under the same name.
    fn plan_loose_movie(&self, path: &Path, name: &str, title: &TitleYear) -> Vec<PlanStep> {
        let stem = title.canonical_stem();
        let folder = path.with_file_name(&stem);
        vec![
            PlanStep::CreateDir {
                path: folder.clone(),
            },
            PlanStep::Rename {
                from: path.to_path_buf(),
                to: folder.join(renamed(&stem, name)),
            },
        ]
    }

    fn plan_movie_folder(
        &self,
        path: &Path,
        entries: &[MediaEntry],
        title: &TitleYear,
    ) -> Result<Vec<PlanStep>> {
        let stem = title.canonical_stem();
        let folder = path.with_file_name(&stem);
        let mut steps = Vec::new();
        push_rename(&mut steps, path.to_path_buf(), folder.clone());

        let videos = file_names(entries, is_video);
        let subtitles = file_names(entries, is_subtitle);
        let extractor = self.engine.title_extractor();

        let Some(primary) = primary_file(&videos, &title.clean_title, extractor) else {
            bail!("unable to determine the movie file inside {}", path.display());
        };
        push_rename(
            &mut steps,
            folder.join(primary),
            folder.join(renamed(&stem, primary)),
        );
        for video in videos.iter().filter(|v| **v != primary) {
            steps.push(PlanStep::Skip {
                path: folder.join(video),
                reason: "not the primary video".into(),
            });
        }

        match primary_file(&subtitles, &title.clean_title, extractor) {
            Some(subtitle) => push_rename(
                &mut steps,
                folder.join(subtitle),
                folder.join(renamed(&stem, subtitle)),
            ),
            None if !subtitles.is_empty() => {
                warn!(count = subtitles.len(), "unable to pick the primary subtitles");
                for subtitle in &subtitles {
                    steps.push(PlanStep::Skip {
                        path: folder.join(subtitle),
                        reason: "primary subtitles unknown".into(),
                    });
                }
            }
            None => {}
        }

        push_purges(&mut steps, &folder, entries);
        Ok(steps)
    }

    fn plan_show(
        &self,
        path: &Path,
        entries: &[MediaEntry],
        title: &TitleYear,
    ) -> Result<Vec<PlanStep>> {
        let show_dir = path.with_file_name(title.canonical_stem());
        let mut steps = Vec::new();
        push_rename(&mut steps, path.to_path_buf(), show_dir.clone());

        for entry in entries.iter().filter(|e| e.is_dir && is_season_folder(&e.name)) {
            let Some(season) = season_number(&entry.name) else {
                steps.push(PlanStep::Skip {
                    path: show_dir.join(&entry.name),
                    reason: "unable to determine season number".into(),
                });
                continue;
            };

            let season_dir = show_dir.join(season_folder_name(season));
            push_rename(&mut steps, show_dir.join(&entry.name), season_dir.clone());

            let files = list_entries(&path.join(&entry.name))?;
            self.plan_season(&season_dir, season, &files, title, &mut steps)?;
        }

        Ok(steps)
    }

    fn plan_season(
        &self,
        season_dir: &Path,
        season: u32,
        files: &[MediaEntry],
        title: &TitleYear,
        steps: &mut Vec<PlanStep>,
    ) -> Result<()> {
        let videos = file_names(files, is_video);
        let context = self.engine.season_context(title.clone(), Some(season), &videos);
        debug!(season, duplicates = ?context.duplicates, "season context");
        let extractor = self.engine.episode_extractor(context)?;

        let show_stem = title.canonical_stem();
        let mut targets = HashSet::new();
        let media = files
            .iter()
            .filter(|e| !e.is_dir && (is_video(&e.name) || is_subtitle(&e.name)));

        for entry in media {
            let from = season_dir.join(&entry.name);
            let info = match extractor.extract(&inference_name(&entry.name)) {
                Ok(info) => info,
                Err(e) => {
                    steps.push(PlanStep::Skip {
                        path: from,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let stem = episode_stem(&show_stem, season, &info);
            let to = season_dir.join(renamed(&stem, &entry.name));
            if !targets.insert(to.clone()) {
                steps.push(PlanStep::Skip {
                    reason: format!("{} is already a rename target", to.display()),
                    path: from,
                });
                continue;
            }
            push_rename(steps, from, to);
        }

        push_purges(steps, season_dir, files);
        Ok(())
    }
}

fn entry_name(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    Ok(name.to_string())
}

/// Directory listing sorted by name.
fn list_entries(dir: &Path) -> Result<Vec<MediaEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .with_context(|| format!("failed to stat {name}"))?
            .is_dir();
        entries.push(if is_dir {
            MediaEntry::dir(name)
        } else {
            MediaEntry::file(name)
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn file_names(entries: &[MediaEntry], keep: fn(&str) -> bool) -> Vec<&str> {
    entries
        .iter()
        .filter(|e| !e.is_dir && keep(&e.name))
        .map(|e| e.name.as_str())
        .collect()
}

/// Target file name: `stem` plus the suffix `name` keeps on rename.
fn renamed(stem: &str, name: &str) -> String {
    format!("{stem}{}", split_media_suffix(name).1)
}

/// `name` without subtitle qualifiers, so `Show S01E01.en.srt` is read as
/// `Show S01E01.srt`.
fn inference_name(name: &str) -> String {
    let (stem, _) = split_media_suffix(name);
    match extension(name) {
        Some(ext) => format!("{stem}.{ext}"),
        None => name.to_string(),
    }
}

fn push_rename(steps: &mut Vec<PlanStep>, from: PathBuf, to: PathBuf) {
    if from != to {
        steps.push(PlanStep::Rename { from, to });
    }
}

fn push_purges(steps: &mut Vec<PlanStep>, dir: &Path, entries: &[MediaEntry]) {
    for extra in extra_files(entries) {
        steps.push(PlanStep::Purge {
            path: dir.join(&extra.name),
        });
    }
}
