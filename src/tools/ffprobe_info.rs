//! ffprobe 包裝模組
//!
//! 以子行程呼叫 ffprobe 取得影片長度與中繼資料，不解碼任何媒體內容。
//! 探測能力以 [`VideoProber`] 介面抽象，測試時可用假實作替換。

use crate::config::Context;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// 探測失敗的原因
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("無法執行 ffprobe ({ffprobe_path}): {source}")]
    Spawn {
        ffprobe_path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ffprobe 執行失敗 ({path}): {stderr}")]
    Failed { path: PathBuf, stderr: String },
    #[error("無法解析 ffprobe 輸出 ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("找不到視訊串流: {path}")]
    NotAVideo { path: PathBuf },
    #[error("無法取得影片長度: {path}")]
    MissingDuration { path: PathBuf },
}

/// 單一檔案的探測結果
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeData {
    /// 影片長度（秒）
    pub duration_seconds: f64,
    /// 中繼資料中的節目名稱
    pub show_name: Option<String>,
    /// 中繼資料中的集數標題
    pub episode_title: Option<String>,
    /// 中繼資料中的建立時間
    pub creation_time: Option<NaiveDateTime>,
}

/// 影片探測能力介面
pub trait VideoProber {
    fn probe(&self, path: &Path) -> Result<ProbeData, ProbeError>;
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
    tags: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// 以 ffprobe 子行程實作的探測器
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ctx: Context,
}

impl FfprobeProber {
    #[must_use]
    pub const fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl VideoProber for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<ProbeData, ProbeError> {
        let output = Command::new(&self.ctx.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|source| ProbeError::Spawn {
                ffprobe_path: self.ctx.ffprobe_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout), path, &self.ctx.show_tags)
    }
}

/// 解析 ffprobe 的 JSON 輸出
///
/// 長度優先取 format.duration，其次取視訊串流的 duration。
/// 節目名稱依 `show_tags` 的順序嘗試各個標籤。
fn parse_probe_output(
    raw: &str,
    path: &Path,
    show_tags: &[String],
) -> Result<ProbeData, ProbeError> {
    let probe: FfprobeOutput = serde_json::from_str(raw).map_err(|source| ProbeError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let streams = probe.streams.unwrap_or_default();
    let video_stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ProbeError::NotAVideo {
            path: path.to_path_buf(),
        })?;

    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(parse_duration)
        .or_else(|| video_stream.duration.as_deref().and_then(parse_duration))
        .ok_or_else(|| ProbeError::MissingDuration {
            path: path.to_path_buf(),
        })?;

    let tags = probe.format.and_then(|f| f.tags).unwrap_or_default();
    let show_name = show_tags.iter().find_map(|tag| non_empty(tags.get(tag)));
    let episode_title = non_empty(tags.get("title"));
    let creation_time = tags
        .get("creation_time")
        .and_then(|value| parse_creation_time(value));

    Ok(ProbeData {
        duration_seconds,
        show_name,
        episode_title,
        creation_time,
    })
}

/// ffprobe 的 duration 欄位可能是 "N/A" 之類的非數值
fn parse_duration(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 解析 creation_time 標籤，常見格式如 "2023-03-01T12:34:56.000000Z"
fn parse_creation_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    const FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
