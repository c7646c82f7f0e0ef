use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("掃描目錄不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("掃描路徑不是資料夾: {}", path.display());
    }
    Ok(())
}
