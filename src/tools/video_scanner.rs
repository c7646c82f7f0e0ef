use crate::config::is_video_file;
use anyhow::{Context as _, Result};
use log::warn;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// 掃描時發現的影片檔案
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub size: u64,
    pub mtime: SystemTime,
}

/// 掃描結果
#[derive(Debug, Default)]
pub struct ScanResult {
    /// 依路徑字典序排序的影片檔案
    pub videos: Vec<DiscoveredFile>,
    /// 略過的非影片檔案數
    pub ignored: usize,
}

/// 掃描目錄下所有影片檔案，依路徑字典序排序，確保重複執行的處理順序一致
pub fn scan_video_files(directory: &Path) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for entry in WalkDir::new(directory).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            // 來源目錄本身讀不到屬於結構性錯誤，整次執行必須失敗
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("無法讀取來源目錄: {}", directory.display()));
            }
            Err(e) => {
                warn!("無法讀取目錄項目: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_video_file(entry.path()) {
            result.ignored += 1;
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("無法讀取檔案屬性 {}: {e}", entry.path().display());
                result.ignored += 1;
                continue;
            }
        };
        let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        result.videos.push(DiscoveredFile {
            path: entry.into_path(),
            size: metadata.len(),
            mtime,
        });
    }

    result.videos.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(result)
}
