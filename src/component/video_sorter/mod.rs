pub mod classifier;
mod main;
pub mod placer;

pub use classifier::{ClassifyOptions, PlacementDecision, classify, sanitize};
pub use main::{RunOutcome, SortOptions, process_videos, process_videos_with_context};
pub use placer::{PlaceOptions, PlacementError, PlacementOutcome, place};
