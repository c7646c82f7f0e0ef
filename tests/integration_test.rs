//! 整合測試 — 以假探測器驗證完整分類流程
//!
//! 不呼叫任何外部程式，探測結果由測試預先定義。

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::NaiveDate;
use normalize_mp4::component::video_sorter::{SortOptions, process_videos};
use normalize_mp4::tools::{ProbeData, ProbeError, VideoProber};
use tempfile::TempDir;

/// 假探測器：以檔名對應預先定義的結果
struct FakeProber {
    results: HashMap<String, ProbeData>,
    not_video: Vec<String>,
}

impl FakeProber {
    fn new() -> Self {
        Self {
            results: HashMap::new(),
            not_video: Vec::new(),
        }
    }

    fn with(mut self, name: &str, data: ProbeData) -> Self {
        self.results.insert(name.to_string(), data);
        self
    }

    fn with_not_video(mut self, name: &str) -> Self {
        self.not_video.push(name.to_string());
        self
    }
}

impl VideoProber for FakeProber {
    fn probe(&self, path: &Path) -> Result<ProbeData, ProbeError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.not_video.contains(&name) {
            return Err(ProbeError::NotAVideo {
                path: path.to_path_buf(),
            });
        }
        self.results
            .get(&name)
            .cloned()
            .ok_or_else(|| ProbeError::Failed {
                path: path.to_path_buf(),
                stderr: "simulated unreadable file".to_string(),
            })
    }
}

fn probe_data(duration: f64, show: Option<&str>, title: Option<&str>) -> ProbeData {
    ProbeData {
        duration_seconds: duration,
        show_name: show.map(str::to_string),
        episode_title: title.map(str::to_string),
        creation_time: NaiveDate::from_ymd_opt(2023, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0),
    }
}

fn sort_options(root: &TempDir) -> SortOptions {
    SortOptions {
        basedir: root.path().join("input"),
        content_dir: root.path().join("content"),
        filler_dir: root.path().join("filler"),
        filler_threshold: 600.0,
        default_show_name: "Variety Hour".to_string(),
        move_files: false,
        overwrite: false,
        dry_run: false,
    }
}

fn setup_input(root: &TempDir, names: &[&str]) {
    let input = root.path().join("input");
    fs::create_dir_all(&input).unwrap();
    for name in names {
        fs::write(input.join(name), format!("video bytes of {name}")).unwrap();
    }
}

fn shutdown() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

/// 快照目錄下所有檔案的相對路徑與內容
fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut entries: Vec<(PathBuf, Vec<u8>)> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let content = fs::read(e.path()).unwrap();
            (e.path().strip_prefix(dir).unwrap().to_path_buf(), content)
        })
        .collect();
    entries.sort();
    entries
}

#[test]
fn test_long_video_placed_in_content() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["clip.mp4"]);
    let prober = FakeProber::new().with("clip.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")));

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert_eq!(outcome.placed, 1);
    assert_eq!(outcome.failed, 0);
    let target = root
        .path()
        .join("content/My Show/2023-03-01 Ep 1 (2023).mp4");
    assert!(target.is_file());
    // 複製模式下來源必須保留
    assert!(root.path().join("input/clip.mp4").is_file());
}

#[test]
fn test_short_video_placed_in_filler_with_default_show() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["clip.mp4"]);
    let prober = FakeProber::new().with("clip.mp4", probe_data(300.0, None, None));

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert_eq!(outcome.placed, 1);
    let target = root
        .path()
        .join("filler/Variety Hour/2023-03-01 clip (2023).mp4");
    assert!(target.is_file());
}

#[test]
fn test_duration_at_threshold_is_content() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["exact.mp4"]);
    let prober = FakeProber::new().with("exact.mp4", probe_data(600.0, Some("My Show"), Some("Ep 1")));

    process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert!(root.path().join("content").is_dir());
    assert!(!root.path().join("filler").exists());
}

#[test]
fn test_move_removes_source() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["clip.mp4"]);
    let prober = FakeProber::new().with("clip.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")));

    let mut options = sort_options(&root);
    options.move_files = true;
    let outcome = process_videos(&options, &prober, &shutdown()).unwrap();

    assert_eq!(outcome.placed, 1);
    assert!(!root.path().join("input/clip.mp4").exists());
    assert!(
        root.path()
            .join("content/My Show/2023-03-01 Ep 1 (2023).mp4")
            .is_file()
    );
}

#[test]
fn test_dry_run_mutates_nothing() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["a.mp4", "b.mkv"]);
    let prober = FakeProber::new()
        .with("a.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")))
        .with("b.mkv", probe_data(120.0, None, None));

    let before = snapshot(root.path());

    let mut options = sort_options(&root);
    options.dry_run = true;
    options.move_files = true;
    let outcome = process_videos(&options, &prober, &shutdown()).unwrap();

    assert_eq!(outcome.placed, 2);
    assert!(outcome.dry_run);
    assert_eq!(snapshot(root.path()), before);
}

#[test]
fn test_failed_probe_does_not_abort_run() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["bad.mp4", "good.mp4"]);
    // bad.mp4 沒有對應的探測結果，會回報失敗
    let prober = FakeProber::new().with("good.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")));

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.placed, 1);
    assert!(
        root.path()
            .join("content/My Show/2023-03-01 Ep 1 (2023).mp4")
            .is_file()
    );
}

#[test]
fn test_no_video_stream_counts_as_ignored() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["audio_only.mp4", "real.mp4"]);
    let prober = FakeProber::new()
        .with("real.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")))
        .with_not_video("audio_only.mp4");

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert_eq!(outcome.ignored, 1);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.placed, 1);
}

#[test]
fn test_non_video_files_skipped_silently() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["clip.mp4", "notes.txt", "cover.jpg"]);
    let prober = FakeProber::new().with("clip.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")));

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert_eq!(outcome.ignored, 2);
    assert_eq!(outcome.placed, 1);
    assert_eq!(outcome.failed, 0);
}

#[test]
fn test_collision_skipped_and_preserved() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["clip.mp4"]);
    let prober = FakeProber::new().with("clip.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")));

    let existing_dir = root.path().join("content/My Show");
    let existing = existing_dir.join("2023-03-01 Ep 1 (2023).mp4");
    fs::create_dir_all(&existing_dir).unwrap();
    fs::write(&existing, "pre-existing content").unwrap();

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    // 碰撞是預期結果，不是錯誤
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.placed, 0);
    assert_eq!(fs::read_to_string(&existing).unwrap(), "pre-existing content");
    assert!(root.path().join("input/clip.mp4").is_file());
}

#[test]
fn test_overwrite_replaces_existing_target() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["clip.mp4"]);
    let prober = FakeProber::new().with("clip.mp4", probe_data(900.0, Some("My Show"), Some("Ep 1")));

    let existing_dir = root.path().join("content/My Show");
    let existing = existing_dir.join("2023-03-01 Ep 1 (2023).mp4");
    fs::create_dir_all(&existing_dir).unwrap();
    fs::write(&existing, "pre-existing content").unwrap();

    let mut options = sort_options(&root);
    options.overwrite = true;
    let outcome = process_videos(&options, &prober, &shutdown()).unwrap();

    assert_eq!(outcome.placed, 1);
    assert_eq!(
        fs::read_to_string(&existing).unwrap(),
        "video bytes of clip.mp4"
    );
}

#[test]
fn test_lexical_order_first_source_wins_on_shared_target() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["aaa.mp4", "zzz.mp4"]);
    // 兩個來源會對應到同一個目標檔名
    let prober = FakeProber::new()
        .with("aaa.mp4", probe_data(900.0, Some("My Show"), Some("Same Ep")))
        .with("zzz.mp4", probe_data(900.0, Some("My Show"), Some("Same Ep")));

    let outcome = process_videos(&sort_options(&root), &prober, &shutdown()).unwrap();

    assert_eq!(outcome.placed, 1);
    assert_eq!(outcome.skipped, 1);
    let target = root
        .path()
        .join("content/My Show/2023-03-01 Same Ep (2023).mp4");
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "video bytes of aaa.mp4"
    );
}

#[test]
fn test_unreadable_basedir_is_structural_error() {
    let root = TempDir::new().unwrap();
    let prober = FakeProber::new();

    let mut options = sort_options(&root);
    options.basedir = root.path().join("no/such/base/dir");
    let result = process_videos(&options, &prober, &shutdown());

    // 來源目錄讀不到必須回傳錯誤，而不是空的成功結果
    assert!(result.is_err());
    assert!(!root.path().join("content").exists());
    assert!(!root.path().join("filler").exists());
}

#[test]
fn test_shutdown_signal_stops_processing() {
    let root = TempDir::new().unwrap();
    setup_input(&root, &["a.mp4", "b.mp4"]);
    let prober = FakeProber::new()
        .with("a.mp4", probe_data(900.0, None, None))
        .with("b.mp4", probe_data(900.0, None, None));

    let flag = Arc::new(AtomicBool::new(true));
    let outcome = process_videos(&sort_options(&root), &prober, &flag).unwrap();

    assert_eq!(outcome.total(), 0);
}
