pub mod types;

pub use types::{Context, VIDEO_EXTENSIONS, is_video_file};
