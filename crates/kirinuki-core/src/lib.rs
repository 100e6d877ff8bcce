//! # Kirinuki Core
//!
//! Heuristic metadata inference for movie and TV filenames: title and year
//! from a folder name, episode numbers, titles and part markers from episode
//! files, plus the helpers needed to lay a library out under canonical names.
//!
//! ## Quick Start
//!
//! ```rust
//! use kirinuki_core::{Engine, SeasonContext, naming};
//!
//! let engine = Engine::with_defaults().unwrap();
//! let show = engine.title_year("Invincible (2021)", "").unwrap();
//!
//! let context = SeasonContext::new(show.clone(), Some(1));
//! let file = "Invincible (2021) - S01E02 - Here Goes Nothing (1080p WEB-DL x265 SAMPA).mkv";
//! let info = engine.episode_info(file, &context).unwrap();
//!
//! assert_eq!(info.numbers, vec![2]);
//! assert_eq!(info.name.as_deref(), Some("Here Goes Nothing"));
//! assert_eq!(
//!     naming::episode_stem(&show.canonical_stem(), 1, &info),
//!     "Invincible (2021) S01E02 - Here Goes Nothing"
//! );
//! ```
pub mod error;
pub mod media;
pub mod naming;
pub mod parser;
pub mod types;

// Re-export primary API
pub use error::{KirinukiError, Result};
pub use parser::{
    DuplicateTokens, Engine, EpisodeExtractor, InferenceConfig, SeasonContext,
    TitleYearExtractor, compute_duplicate_tokens, infer_episode_info, infer_title_year,
};
pub use types::{EpisodeInfo, InputType, MediaEntry, TitleYear};
