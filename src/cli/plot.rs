//! # plot 子命令 CLI 定义
//!
//! 检测峰并生成带标注的光谱图与峰 JSON。
//! 输入为目录时进入批量模式。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plot.rs`

use super::common::{LabelArgs, SpectrumArgs};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::render::PlotFormat;

use clap::Args;
use std::path::PathBuf;

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Input: spectrum file (.csv, .tsv, .xlsx) or directory of spectra
    pub input: PathBuf,

    /// Output plot file (single mode, default ir_spectrum_labeled.pdf) or directory (batch mode, default labeled_spectra)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output file for peak labels as JSON (single mode)
    #[arg(long, default_value = "peaks.json")]
    pub json: PathBuf,

    /// Plot format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<PlotFormat>,

    #[command(flatten)]
    pub spectrum: SpectrumArgs,

    #[command(flatten)]
    pub labels: LabelArgs,

    /// Figure width in points (PDF/SVG) or pixels (PNG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in points (PDF/SVG) or pixels (PNG)
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Title for the plot
    #[arg(long, default_value = "IR Spectrum")]
    pub title: String,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob patterns for input files (batch mode, comma separated)
    #[arg(long, default_value = "*.csv,*.tsv,*.xlsx")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files (batch mode)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

impl PlotArgs {
    /// 构建并校验分析配置
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let config = AnalysisConfig {
            detection: self.spectrum.detection_config(),
            labels: self.labels.label_config()?,
        };
        config.validate()?;
        Ok(config)
    }
}
