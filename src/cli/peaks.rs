//! # peaks 子命令 CLI 定义
//!
//! 仅检测峰：打印峰表，可选导出 CSV 与手动偏移模板。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/peaks.rs`

use super::common::SpectrumArgs;
use crate::config::{AnalysisConfig, LabelConfig, DEFAULT_MAX_LABELS, DEFAULT_OFFSET};
use crate::error::Result;

use clap::Args;
use std::path::PathBuf;

/// peaks 子命令参数
#[derive(Args, Debug)]
pub struct PeaksArgs {
    /// Input spectrum file (.csv, .tsv, .xlsx)
    pub input: PathBuf,

    #[command(flatten)]
    pub spectrum: SpectrumArgs,

    /// Maximum number of peaks (1-100)
    #[arg(long, default_value_t = DEFAULT_MAX_LABELS, env = "IRLABEL_MAX_LABELS")]
    pub max_labels: usize,

    /// Write the peak table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write a JSON template of per-peak offsets for `plot --overrides-file`
    #[arg(long)]
    pub overrides_template: Option<PathBuf>,

    /// Offset written into the template for every peak (1.0-20.0)
    #[arg(long, default_value_t = DEFAULT_OFFSET, env = "IRLABEL_OFFSET")]
    pub offset: f64,
}

impl PeaksArgs {
    /// 构建并校验分析配置
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let config = AnalysisConfig {
            detection: self.spectrum.detection_config(),
            labels: LabelConfig {
                default_offset: self.offset,
                max_labels: self.max_labels,
                ..LabelConfig::default()
            },
        };
        config.validate()?;
        Ok(config)
    }
}
