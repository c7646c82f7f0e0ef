//! 檔案放置
//!
//! 依決策執行複製或移動，處理覆寫、碰撞與 dry-run。
//! 寫入一律先寫到暫存名再改名，中斷時不會留下不完整的目標檔。

use super::classifier::PlacementDecision;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// 放置失敗的原因，檔案仍留在來源位置
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("無法建立目標資料夾 {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("複製檔案失敗 {from} -> {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("無法將暫存檔改名為 {to}: {source}")]
    Commit {
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("刪除來源檔案失敗 {path}: {source}")]
    RemoveSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 放置結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// dry-run 模式下的計畫動作，未碰任何檔案
    Planned,
    /// 已複製或移動到目標位置
    Placed,
    /// 目標已存在且未啟用覆寫，來源與目標都未變動
    SkippedCollision,
}

/// 放置選項
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceOptions {
    pub move_file: bool,
    pub overwrite: bool,
    pub dry_run: bool,
}

/// 執行單一放置決策
pub fn place(
    decision: &PlacementDecision,
    options: PlaceOptions,
) -> Result<PlacementOutcome, PlacementError> {
    if options.dry_run {
        return Ok(PlacementOutcome::Planned);
    }

    if !options.overwrite && decision.target.exists() {
        debug!("跳過已存在的檔案: {}", decision.target.display());
        return Ok(PlacementOutcome::SkippedCollision);
    }

    if let Some(parent) = decision.target.parent() {
        fs::create_dir_all(parent).map_err(|source| PlacementError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    if options.move_file {
        move_file(&decision.source, &decision.target)?;
    } else {
        copy_via_temp(&decision.source, &decision.target)?;
    }

    debug!(
        "{}: {} -> {}",
        if options.move_file { "移動" } else { "複製" },
        decision.source.display(),
        decision.target.display()
    );
    Ok(PlacementOutcome::Placed)
}

/// 先複製到同目錄的暫存名再改名進目標位置
///
/// 失敗時清掉暫存檔，來源檔案不受影響。
fn copy_via_temp(source: &Path, target: &Path) -> Result<(), PlacementError> {
    let temp = temp_path(target);

    if let Err(e) = fs::copy(source, &temp) {
        let _ = fs::remove_file(&temp);
        return Err(PlacementError::Copy {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
            source: e,
        });
    }

    fs::rename(&temp, target).map_err(|e| {
        let _ = fs::remove_file(&temp);
        PlacementError::Commit {
            to: target.to_path_buf(),
            source: e,
        }
    })
}

/// 移動檔案
///
/// 先嘗試 rename；失敗（可能跨檔案系統）時改為複製後刪除，
/// 來源只在目標寫入完成後才會刪除。
fn move_file(source: &Path, target: &Path) -> Result<(), PlacementError> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    copy_via_temp(source, target)?;
    fs::remove_file(source).map_err(|e| PlacementError::RemoveSource {
        path: source.to_path_buf(),
        source: e,
    })
}

fn temp_path(target: &Path) -> PathBuf {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!(".{}.part", Uuid::new_v4()))
}
