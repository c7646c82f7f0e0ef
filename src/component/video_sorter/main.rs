//! 影片分類流程
//!
//! 掃描來源目錄，逐一探測、分類並放置影片，彙總整次執行的結果。
//! 單一檔案的失敗只會記錄，不會中止整次執行。

use super::classifier::{ClassifyOptions, classify};
use super::placer::{PlaceOptions, PlacementOutcome, place};
use crate::config::Context;
use crate::tools::{FfprobeProber, ProbeError, VideoProber, scan_video_files};
use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 一次執行的選項
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// 掃描的來源目錄
    pub basedir: PathBuf,
    /// 長片的目標目錄
    pub content_dir: PathBuf,
    /// 短片的目標目錄
    pub filler_dir: PathBuf,
    /// 長短片分界（秒）
    pub filler_threshold: f64,
    /// 中繼資料缺少節目名稱時的預設值
    pub default_show_name: String,
    /// true 為移動，false 為複製
    pub move_files: bool,
    pub overwrite: bool,
    pub dry_run: bool,
}

/// 整次執行的統計結果
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// 已放置的檔案數，dry-run 模式下為計畫放置數
    pub placed: usize,
    /// 因目標已存在而跳過的檔案數
    pub skipped: usize,
    /// 探測或放置失敗的檔案數
    pub failed: usize,
    /// 非影片或無視訊串流的檔案數
    pub ignored: usize,
    /// 本次是否為 dry-run
    pub dry_run: bool,
}

impl RunOutcome {
    /// 實際進入處理流程的檔案總數
    #[must_use]
    pub fn total(&self) -> usize {
        self.placed + self.skipped + self.failed
    }
}

/// 掃描 basedir 並逐一處理影片檔案
///
/// 處理順序為路徑字典序，重複執行在相同目錄樹上會得到相同順序。
/// 兩次探測之間會檢查中斷旗標，收到中斷時放棄剩餘檔案。
pub fn process_videos<P: VideoProber>(
    options: &SortOptions,
    prober: &P,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<RunOutcome> {
    let scan = scan_video_files(&options.basedir)?;
    info!(
        "掃描到 {} 個影片檔案，略過 {} 個非影片檔案",
        scan.videos.len(),
        scan.ignored
    );

    let classify_options = ClassifyOptions {
        content_dir: options.content_dir.clone(),
        filler_dir: options.filler_dir.clone(),
        filler_threshold: options.filler_threshold,
        default_show_name: options.default_show_name.clone(),
    };
    let place_options = PlaceOptions {
        move_file: options.move_files,
        overwrite: options.overwrite,
        dry_run: options.dry_run,
    };

    let mut outcome = RunOutcome {
        ignored: scan.ignored,
        dry_run: options.dry_run,
        ..RunOutcome::default()
    };

    for file in &scan.videos {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止處理剩餘檔案");
            break;
        }

        let probe = match prober.probe(&file.path) {
            Ok(probe) => probe,
            Err(ProbeError::NotAVideo { .. }) => {
                info!("略過無視訊串流的檔案: {}", file.path.display());
                outcome.ignored += 1;
                continue;
            }
            Err(e) => {
                warn!("探測失敗 {}: {e}", file.path.display());
                outcome.failed += 1;
                continue;
            }
        };

        let decision = classify(file, &probe, &classify_options);
        if options.dry_run {
            println!(
                "plan: {} -> {}  ({:.0}s)",
                decision.source.display(),
                decision.target.display(),
                probe.duration_seconds
            );
        }

        match place(&decision, place_options) {
            Ok(PlacementOutcome::Placed) => {
                info!(
                    "{}: {} -> {}",
                    if options.move_files { "已移動" } else { "已複製" },
                    decision.source.display(),
                    decision.target.display()
                );
                outcome.placed += 1;
            }
            Ok(PlacementOutcome::Planned) => outcome.placed += 1,
            Ok(PlacementOutcome::SkippedCollision) => {
                info!("跳過已存在的目標: {}", decision.target.display());
                outcome.skipped += 1;
            }
            Err(e) => {
                warn!("放置失敗 {}: {e}", decision.source.display());
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}

/// 以 Context 設定的 ffprobe 執行完整流程
pub fn process_videos_with_context(
    options: &SortOptions,
    ctx: &Context,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<RunOutcome> {
    let prober = FfprobeProber::new(ctx.clone());
    process_videos(options, &prober, shutdown_signal)
}
