//! # 共享 CLI 参数
//!
//! `plot` 与 `peaks` 共用的光谱加载、峰检测与标注参数。
//!
//! ## 依赖关系
//! - 被 `cli/plot.rs`, `cli/peaks.rs` 使用
//! - 转换为 `config.rs` 与 `loader/` 的配置结构

use crate::config::{
    DetectionConfig, LabelConfig, MissingOverridePolicy, OffsetOverrides, DEFAULT_MAX_LABELS,
    DEFAULT_MIN_PROMINENCE, DEFAULT_MIN_SEPARATION, DEFAULT_OFFSET,
};
use crate::error::Result;
use crate::loader::{LoadOptions, TableFormat};

use clap::Args;
use std::path::PathBuf;

/// 光谱加载与峰检测参数
#[derive(Args, Debug, Clone)]
pub struct SpectrumArgs {
    /// Treat the first row as data instead of a header
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// Input content type (e.g. text/csv), overrides detection by extension
    #[arg(long)]
    pub content_type: Option<String>,

    /// Minimum distance between peaks, in rows
    #[arg(long, default_value_t = DEFAULT_MIN_SEPARATION)]
    pub min_separation: usize,

    /// Minimum peak prominence, in %T
    #[arg(long, default_value_t = DEFAULT_MIN_PROMINENCE)]
    pub min_prominence: f64,

    /// Limit the prominence search to a window of this many rows around each peak
    #[arg(long)]
    pub window: Option<usize>,
}

impl SpectrumArgs {
    pub fn load_options(&self) -> Result<LoadOptions> {
        let format = match &self.content_type {
            Some(content_type) => Some(TableFormat::from_content_type(content_type)?),
            None => None,
        };
        Ok(LoadOptions {
            has_header: !self.no_header,
            format,
        })
    }

    pub fn detection_config(&self) -> DetectionConfig {
        DetectionConfig {
            min_separation: self.min_separation,
            min_prominence: self.min_prominence,
            window: self.window,
        }
    }
}

/// 标注参数
#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// Disable peak labels (no detection, empty peak JSON)
    #[arg(long, default_value_t = false)]
    pub no_labels: bool,

    /// Default vertical offset of labels below their peak (1.0-20.0)
    #[arg(long, default_value_t = DEFAULT_OFFSET, env = "IRLABEL_OFFSET")]
    pub offset: f64,

    /// Maximum number of labels (1-100)
    #[arg(long, default_value_t = DEFAULT_MAX_LABELS, env = "IRLABEL_MAX_LABELS")]
    pub max_labels: usize,

    /// Use per-peak label offsets
    #[arg(long, default_value_t = false)]
    pub manual: bool,

    /// Per-peak offset as WAVENUMBER=OFFSET (repeatable, e.g. 1715.32=8)
    #[arg(long = "label-offset", value_name = "WN=OFFSET")]
    pub label_offsets: Vec<String>,

    /// JSON file with per-peak offsets: {"1715.32": 8.0, ...}
    #[arg(long)]
    pub overrides_file: Option<PathBuf>,

    /// What to do when --manual is set and a peak has no offset
    #[arg(long, value_enum, default_value = "fallback")]
    pub missing_override: MissingOverridePolicy,
}

impl LabelArgs {
    /// 构建标注配置（文件中的偏移先读入，命令行条目覆盖同名键）
    pub fn label_config(&self) -> Result<LabelConfig> {
        let mut overrides = match &self.overrides_file {
            Some(path) => OffsetOverrides::from_json_file(path)?,
            None => OffsetOverrides::new(),
        };

        for entry in &self.label_offsets {
            let (key, offset) = OffsetOverrides::parse_entry(entry)?;
            overrides.insert(key, offset);
        }

        Ok(LabelConfig {
            labels_enabled: !self.no_labels,
            default_offset: self.offset,
            manual_overrides_enabled: self.manual,
            max_labels: self.max_labels,
            overrides,
            missing_override: self.missing_override,
        })
    }
}
