pub mod duplicates;
pub mod engine;
pub mod episode;
pub mod rules;
pub mod tags;
pub mod title;
pub mod tokenizer;

pub use duplicates::{DuplicateTokenSuppressor, DuplicateTokens};
pub use engine::{
    Engine, InferenceConfig, compute_duplicate_tokens, infer_episode_info, infer_title_year,
};
pub use episode::{EpisodeExtractor, SeasonContext};
pub use rules::{EpisodeMatch, EpisodeRuleKind, EpisodeRules};
pub use tags::strip_tags;
pub use title::TitleYearExtractor;
pub use tokenizer::Tokenizer;
