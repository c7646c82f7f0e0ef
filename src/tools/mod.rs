mod ffprobe_info;
mod path_validator;
mod video_scanner;

pub use ffprobe_info::{FfprobeProber, ProbeData, ProbeError, VideoProber};
pub use path_validator::validate_directory_exists;
pub use video_scanner::{DiscoveredFile, ScanResult, scan_video_files};
