//! 功能元件模組

pub mod video_sorter;

pub use video_sorter::{RunOutcome, SortOptions, process_videos, process_videos_with_context};
