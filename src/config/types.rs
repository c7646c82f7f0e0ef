use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// 視為影片的副檔名
pub const VIDEO_EXTENSIONS: [&str; 7] = ["avi", "m4v", "mkv", "mov", "mp4", "ts", "webm"];

#[cfg(windows)]
const FFPROBE_BINARY: &str = "ffprobe.exe";
#[cfg(not(windows))]
const FFPROBE_BINARY: &str = "ffprobe";

#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// 整次執行共用的環境設定，建立後不再變動
#[derive(Debug, Clone)]
pub struct Context {
    /// ffprobe 執行檔位置
    pub ffprobe_path: PathBuf,
    /// 讀取節目名稱時依序嘗試的中繼資料標籤
    pub show_tags: Vec<String>,
}

impl Context {
    #[must_use]
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self {
            ffprobe_path,
            show_tags: vec!["show".to_string(), "album".to_string()],
        }
    }

    /// 解析 ffprobe 位置
    ///
    /// 有指定 bindir 時檢查檔案存在，否則從 PATH 尋找並以 `-version` 驗證可執行。
    /// 找不到工具屬於結構性錯誤，在處理任何檔案前就會失敗。
    pub fn resolve(ffmpeg_bindir: Option<&Path>) -> Result<Self> {
        let ffprobe_path = match ffmpeg_bindir {
            Some(dir) => {
                let path = dir.join(FFPROBE_BINARY);
                if !path.is_file() {
                    bail!("找不到 ffprobe: {}", path.display());
                }
                path
            }
            None => {
                let path = PathBuf::from(FFPROBE_BINARY);
                let output = Command::new(&path).arg("-version").output().with_context(|| {
                    format!("無法執行 {FFPROBE_BINARY}，請安裝 ffmpeg 或指定 --ffmpeg-bindir")
                })?;
                if !output.status.success() {
                    bail!("{FFPROBE_BINARY} 無法正常執行");
                }
                path
            }
        };
        Ok(Self::new(ffprobe_path))
    }
}
