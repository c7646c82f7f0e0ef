//! 命令列介面

use crate::component::video_sorter::SortOptions;
use crate::tools::validate_directory_exists;
use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

/// Categorize and copy or move video files by duration.
#[derive(Parser, Debug)]
#[command(name = "normalize-mp4", version)]
pub struct Cli {
    /// Directory to search for video files.
    pub directory: PathBuf,

    /// Directory for long videos (scheduled content).
    pub content_dir: PathBuf,

    /// Directory for short videos (filler).
    pub filler_dir: PathBuf,

    /// Seconds separating long and short videos.
    #[arg(long, default_value_t = 600.0, allow_negative_numbers = true)]
    pub filler_threshold: f64,

    /// Path to the directory containing ffprobe/ffmpeg.
    #[arg(long)]
    pub ffmpeg_bindir: Option<PathBuf>,

    /// Default show name when missing in metadata.
    #[arg(long, default_value = "Show")]
    pub show_name: String,

    /// Move files instead of copying.
    #[arg(long = "move")]
    pub move_files: bool,

    /// Overwrite existing files.
    #[arg(long)]
    pub overwrite: bool,

    /// Print planned actions without changing files.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// 驗證參數並轉成執行選項，結構性錯誤在任何檔案被處理前就失敗
    pub fn into_options(self) -> Result<SortOptions> {
        validate_directory_exists(&self.directory)?;
        if !self.filler_threshold.is_finite() || self.filler_threshold < 0.0 {
            bail!("--filler-threshold 必須是非負數，收到: {}", self.filler_threshold);
        }

        Ok(SortOptions {
            basedir: self.directory,
            content_dir: self.content_dir,
            filler_dir: self.filler_dir,
            filler_threshold: self.filler_threshold,
            default_show_name: self.show_name,
            move_files: self.move_files,
            overwrite: self.overwrite,
            dry_run: self.dry_run,
        })
    }
}
