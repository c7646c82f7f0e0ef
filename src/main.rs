use anyhow::Result;
use clap::Parser;
use console::style;
use log::info;
use normalize_mp4::cli::Cli;
use normalize_mp4::component::video_sorter::process_videos_with_context;
use normalize_mp4::config::Context;
use normalize_mp4::init;
use normalize_mp4::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();
    let cli = Cli::parse();

    // 結構性錯誤（參數無效、找不到 ffprobe）在這裡直接失敗並回傳非零
    let ctx = Context::resolve(cli.ffmpeg_bindir.as_deref())?;
    let options = cli.into_options()?;
    let shutdown_signal = setup_shutdown_signal();

    let outcome = process_videos_with_context(&options, &ctx, &shutdown_signal)?;

    let heading = if outcome.dry_run {
        "=== 計畫結果（dry-run）==="
    } else {
        "=== 處理結果 ==="
    };
    println!("\n{}", style(heading).cyan().bold());
    println!(
        "{}: {}",
        if outcome.dry_run { "計畫放置" } else { "已放置" },
        style(outcome.placed).green()
    );
    println!("跳過（目標已存在）: {}", style(outcome.skipped).yellow());
    println!("略過（非影片）: {}", outcome.ignored);
    if outcome.failed > 0 {
        println!("失敗: {}", style(outcome.failed).red().bold());
    } else {
        println!("失敗: 0");
    }

    info!("處理完成，共 {} 個檔案", outcome.total());
    Ok(())
}
