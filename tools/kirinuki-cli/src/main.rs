//! Kirinuki command line front end
//!
//! Prints inferred metadata as JSON lines and, for a movie or show folder,
//! the rename plan a media server layout needs. Nothing on disk is changed.

mod plan;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kirinuki_core::media::{file_stem, is_subtitle, is_video};
use kirinuki_core::{Engine, InferenceConfig};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "kirinuki")]
#[command(about = "Infer titles, years and episode numbers from media filenames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Share of a season's files a fragment must appear in to be stripped
    #[arg(
        short,
        long,
        global = true,
        env = "KIRINUKI_DUPLICATE_THRESHOLD",
        default_value_t = 0.9
    )]
    threshold: f64,

    /// Shortest fragment considered for duplicate detection
    #[arg(long, global = true, env = "KIRINUKI_MIN_TOKEN_LEN", default_value_t = 3)]
    min_token_len: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer title and year for show, movie or file names
    Title {
        /// Names to parse (read from stdin when omitted)
        names: Vec<String>,
    },
    /// Infer episode info for one season's files
    Episode {
        /// Show folder name the files belong to
        #[arg(short, long)]
        show: String,
        /// Season number
        #[arg(short = 'n', long)]
        season: Option<u32>,
        /// Episode filenames (read from stdin when omitted)
        files: Vec<String>,
    },
    /// List fragments shared by a season's files
    Duplicates {
        /// Episode filenames (read from stdin when omitted)
        files: Vec<String>,
    },
    /// Print the rename plan for a movie file, movie folder or show folder
    Plan {
        /// Path to the movie or show
        path: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct TitleOutput {
    input: String,
    raw_title: Option<String>,
    clean_title: Option<String>,
    year: Option<u16>,
    canonical: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct EpisodeOutput {
    input: String,
    numbers: Vec<u32>,
    name: Option<String>,
    parts: Option<String>,
    code: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct DuplicatesOutput {
    file_count: usize,
    tokens: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Uses `args` when given, otherwise one name per non-empty stdin line.
fn names_or_stdin(args: Vec<String>) -> Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args);
    }

    let mut names = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            names.push(line.to_string());
        }
    }
    Ok(names)
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("failed to serialize output")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}

fn run_title(engine: &Engine, names: Vec<String>, out: &mut impl Write) -> Result<()> {
    for input in names_or_stdin(names)? {
        let name = if is_video(&input) || is_subtitle(&input) {
            file_stem(&input)
        } else {
            input.as_str()
        };

        let output = match engine.title_year(name, &input) {
            Ok(title) => TitleOutput {
                raw_title: Some(title.raw_title.clone()),
                clean_title: Some(title.clean_title.clone()),
                year: title.year,
                canonical: Some(title.canonical_stem()),
                error: None,
                input,
            },
            Err(e) => TitleOutput {
                input,
                raw_title: None,
                clean_title: None,
                year: None,
                canonical: None,
                error: Some(e.to_string()),
            },
        };
        emit(out, &output)?;
    }
    Ok(())
}

fn run_episode(
    engine: &Engine,
    show: &str,
    season: Option<u32>,
    files: Vec<String>,
    out: &mut impl Write,
) -> Result<()> {
    let files = names_or_stdin(files)?;
    let show = engine
        .title_year(show, show)
        .with_context(|| format!("failed to infer show title from {show:?}"))?;
    let context = engine.season_context(show, season, &files);
    debug!(duplicates = context.duplicates.len(), "season context ready");

    let extractor = engine.episode_extractor(context)?;
    for input in files {
        let output = match extractor.extract(&input) {
            Ok(info) => EpisodeOutput {
                code: season.map(|s| info.code(s)),
                numbers: info.numbers,
                name: info.name,
                parts: info.parts,
                error: None,
                input,
            },
            Err(e) => EpisodeOutput {
                input,
                numbers: Vec::new(),
                name: None,
                parts: None,
                code: None,
                error: Some(e.to_string()),
            },
        };
        emit(out, &output)?;
    }
    Ok(())
}

fn run_duplicates(engine: &Engine, files: Vec<String>, out: &mut impl Write) -> Result<()> {
    let files = names_or_stdin(files)?;
    let tokens = engine.duplicate_tokens(&files);
    emit(
        out,
        &DuplicatesOutput {
            file_count: files.len(),
            tokens: tokens.iter().map(str::to_string).collect(),
        },
    )
}

fn run_plan(engine: &Engine, path: PathBuf, out: &mut impl Write) -> Result<()> {
    let steps = plan::Planner::new(engine)
        .plan(&path)
        .with_context(|| format!("failed to plan {}", path.display()))?;
    info!(steps = steps.len(), path = %path.display(), "plan ready");

    for step in &steps {
        emit(out, step)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = InferenceConfig::new()
        .with_duplicate_threshold(cli.threshold)
        .with_min_token_len(cli.min_token_len);
    debug!(?config, "engine configuration");
    let engine = Engine::new(config).context("failed to build inference engine")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Title { names } => run_title(&engine, names, &mut out),
        Commands::Episode {
            show,
            season,
            files,
        } => run_episode(&engine, &show, season, files, &mut out),
        Commands::Duplicates { files } => run_duplicates(&engine, files, &mut out),
        Commands::Plan { path } => run_plan(&engine, path, &mut out),
    }
}
