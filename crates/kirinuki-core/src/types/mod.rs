pub mod episode;
pub mod media;
pub mod title;

pub use episode::EpisodeInfo;
pub use media::{InputType, MediaEntry};
pub use title::TitleYear;
