//! 分類與命名
//!
//! 依影片長度決定 content 或 filler 目錄，依中繼資料產生目標檔名。
//! 這裡全部是純函式，不做任何 I/O。

use crate::tools::{DiscoveredFile, ProbeData};
use chrono::{DateTime, Datelike, Local, NaiveDateTime};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// 單一檔案的放置決策
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    /// 來源路徑
    pub source: PathBuf,
    /// 完整目標路徑（含節目資料夾與檔名）
    pub target: PathBuf,
    /// 是否分類為 content（長片）
    pub is_content: bool,
}

/// 分類所需的設定
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub content_dir: PathBuf,
    pub filler_dir: PathBuf,
    /// 長片與短片的分界（秒），長度達到此值者視為 content
    pub filler_threshold: f64,
    /// 中繼資料沒有節目名稱時使用的預設名稱
    pub default_show_name: String,
}

static REGEX_ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex"));

static REGEX_MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// 清理名稱中的檔案系統非法字元並收斂空白
#[must_use]
pub fn sanitize(name: &str) -> String {
    let cleaned = REGEX_ILLEGAL_CHARS.replace_all(name, " ");
    let cleaned = REGEX_MULTIPLE_SPACES.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// 決定單一檔案的目標路徑
///
/// 長度達到門檻（含等於）者放入 content 目錄，否則放入 filler 目錄。
/// 節目名稱優先取中繼資料，其次取 `default_show_name`；
/// 集數標題優先取中繼資料，其次取來源檔名；
/// 日期與年份取 creation_time，沒有時取來源檔案的修改時間。
/// 相同輸入永遠產生相同決策。
#[must_use]
pub fn classify(
    file: &DiscoveredFile,
    probe: &ProbeData,
    options: &ClassifyOptions,
) -> PlacementDecision {
    let is_content = probe.duration_seconds >= options.filler_threshold;
    let target_root = if is_content {
        &options.content_dir
    } else {
        &options.filler_dir
    };

    let show = probe
        .show_name
        .as_deref()
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            let fallback = sanitize(&options.default_show_name);
            (!fallback.is_empty()).then_some(fallback)
        })
        .unwrap_or_else(|| "Show".to_string());

    let episode = probe
        .episode_title
        .as_deref()
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            file.path
                .file_stem()
                .map(|stem| sanitize(&stem.to_string_lossy()))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "Episode".to_string());

    let timestamp = probe
        .creation_time
        .unwrap_or_else(|| mtime_datetime(file));
    let date_str = timestamp.format("%Y-%m-%d");
    let year = timestamp.year();
    let ext = normalize_extension(&file.path);

    let filename = format!("{date_str} {episode} ({year}).{ext}");

    PlacementDecision {
        source: file.path.clone(),
        target: target_root.join(show).join(filename),
        is_content,
    }
}

fn mtime_datetime(file: &DiscoveredFile) -> NaiveDateTime {
    DateTime::<Local>::from(file.mtime).naive_local()
}

/// 輸出副檔名統一為 mp4 或 mkv
fn normalize_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("mkv") => "mkv",
        _ => "mp4",
    }
}
