//! # 输出文件暂存
//!
//! 一次运行的所有输出先写到目标旁边的暂存文件，全部写完后再统一改名。
//! 任一写入失败时删除暂存文件，目标路径保持不变。
//!
//! 暂存文件名以目标文件名结尾，扩展名不变（PNG 后端按扩展名选择编码）。
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs`, `commands/peaks.rs` 使用

use crate::error::{IrLabelError, Result};

use std::fs;
use std::path::{Path, PathBuf};

const STAGING_PREFIX: &str = ".irlabel-partial-";

/// 一组待提交的输出文件
#[derive(Debug, Default)]
pub struct StagedOutputs {
    /// (暂存路径, 目标路径)
    entries: Vec<(PathBuf, PathBuf)>,
}

impl StagedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个目标文件，返回应当写入的暂存路径
    pub fn stage(&mut self, target: &Path) -> PathBuf {
        let staged = staging_path(target);
        self.entries.push((staged.clone(), target.to_path_buf()));
        staged
    }

    /// 把所有暂存文件改名为目标文件
    ///
    /// 中途失败时删除已经改名的目标和剩余的暂存文件。
    pub fn commit(mut self) -> Result<()> {
        let entries = std::mem::take(&mut self.entries);

        for (i, (staged, target)) in entries.iter().enumerate() {
            if let Err(e) = fs::rename(staged, target) {
                for (_, done) in &entries[..i] {
                    let _ = fs::remove_file(done);
                }
                for (pending, _) in &entries[i..] {
                    let _ = fs::remove_file(pending);
                }
                return Err(IrLabelError::FileWriteError {
                    path: target.display().to_string(),
                    source: e,
                });
            }
        }

        Ok(())
    }
}

impl Drop for StagedOutputs {
    // 未提交（写入出错提前返回）时清理暂存文件
    fn drop(&mut self) {
        for (staged, _) in &self.entries {
            let _ = fs::remove_file(staged);
        }
    }
}

/// `dir/name.ext` -> `dir/.irlabel-partial-name.ext`
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{}{}", STAGING_PREFIX, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_staging_path_keeps_extension() {
        let staged = staging_path(Path::new("out/scan_labeled.png"));
        assert_eq!(staged, Path::new("out/.irlabel-partial-scan_labeled.png"));
        assert_eq!(staged.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[test]
    fn test_commit_moves_all_files() {
        let dir = temp_dir("irlabel_staging_commit");
        let plot = dir.join("plot.pdf");
        let json = dir.join("peaks.json");

        let mut staged = StagedOutputs::new();
        fs::write(staged.stage(&plot), "plot").unwrap();
        fs::write(staged.stage(&json), "[]").unwrap();
        staged.commit().unwrap();

        assert_eq!(fs::read_to_string(&plot).unwrap(), "plot");
        assert_eq!(fs::read_to_string(&json).unwrap(), "[]");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_dropped_without_commit_leaves_nothing() {
        let dir = temp_dir("irlabel_staging_drop");
        let plot = dir.join("plot.pdf");

        {
            let mut staged = StagedOutputs::new();
            fs::write(staged.stage(&plot), "plot").unwrap();
            staged.stage(&dir.join("missing").join("peaks.json"));
        }

        assert!(!plot.exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let dir = temp_dir("irlabel_staging_rollback");
        let plot = dir.join("plot.pdf");

        let mut staged = StagedOutputs::new();
        fs::write(staged.stage(&plot), "plot").unwrap();
        // 暂存文件从未写出，改名失败
        staged.stage(&dir.join("peaks.json"));

        assert!(matches!(
            staged.commit(),
            Err(IrLabelError::FileWriteError { .. })
        ));
        assert!(!plot.exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

        fs::remove_dir_all(&dir).ok();
    }
}
