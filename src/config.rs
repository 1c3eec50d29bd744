//! # 分析配置
//!
//! 一次分析运行所需的全部参数，构建后不可变，整体传入流水线。
//!
//! ## 取值范围
//! - `default_offset`, 手动偏移: [1.0, 20.0]，默认 5.0
//! - `max_labels`: [1, 100]，默认 25
//! - `min_separation` >= 1，默认 30；`min_prominence` >= 0，默认 1.0
//!
//! ## 依赖关系
//! - 被 `pipeline.rs`, `peaks/`, `commands/` 使用
//! - 使用 `models/peak.rs` 的 WavenumberKey

use crate::error::{IrLabelError, Result};
use crate::models::WavenumberKey;

use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const OFFSET_MIN: f64 = 1.0;
pub const OFFSET_MAX: f64 = 20.0;
pub const DEFAULT_OFFSET: f64 = 5.0;
pub const MAX_LABELS_LIMIT: usize = 100;
pub const DEFAULT_MAX_LABELS: usize = 25;
pub const DEFAULT_MIN_SEPARATION: usize = 30;
pub const DEFAULT_MIN_PROMINENCE: f64 = 1.0;

/// 手动模式下缺少某个峰的偏移时的处理方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum MissingOverridePolicy {
    /// Use the default offset
    #[default]
    Fallback,
    /// Fail with an error
    Strict,
}

/// 按波数键索引的手动偏移表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetOverrides(BTreeMap<WavenumberKey, f64>);

impl OffsetOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: WavenumberKey, offset: f64) {
        self.0.insert(key, offset);
    }

    pub fn get(&self, key: &WavenumberKey) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WavenumberKey, &f64)> {
        self.0.iter()
    }

    /// 解析 `WAVENUMBER=OFFSET` 形式的条目
    pub fn parse_entry(entry: &str) -> Result<(WavenumberKey, f64)> {
        let (wn, offset) = entry.split_once('=').ok_or_else(|| {
            IrLabelError::InvalidArgument(format!(
                "Label offset '{}' must look like WAVENUMBER=OFFSET (e.g. 1715.32=8)",
                entry
            ))
        })?;

        let key = WavenumberKey::parse(wn).ok_or_else(|| {
            IrLabelError::InvalidArgument(format!("Invalid wavenumber '{}' in '{}'", wn, entry))
        })?;
        let offset: f64 = offset.trim().parse().map_err(|_| {
            IrLabelError::InvalidArgument(format!("Invalid offset '{}' in '{}'", offset, entry))
        })?;

        Ok((key, offset))
    }

    /// 从 JSON 对象文件读取：`{"3500.00": 8.0, "1715": 3.5}`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| IrLabelError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, f64> = serde_json::from_str(text)?;
        let mut overrides = Self::new();
        for (wn, offset) in raw {
            let key = WavenumberKey::parse(&wn).ok_or_else(|| {
                IrLabelError::InvalidArgument(format!("Invalid wavenumber key '{}'", wn))
            })?;
            overrides.insert(key, offset);
        }
        Ok(overrides)
    }

    /// 写出 JSON 对象
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

/// 峰检测参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// 相邻峰之间的最小行距
    pub min_separation: usize,
    /// 最小显著度 (%T)
    pub min_prominence: f64,
    /// 计算显著度时的窗口长度（样本数），None 表示整条光谱
    pub window: Option<usize>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_separation: DEFAULT_MIN_SEPARATION,
            min_prominence: DEFAULT_MIN_PROMINENCE,
            window: None,
        }
    }
}

/// 标注参数
#[derive(Debug, Clone, PartialEq)]
pub struct LabelConfig {
    pub labels_enabled: bool,
    pub default_offset: f64,
    pub manual_overrides_enabled: bool,
    pub max_labels: usize,
    pub overrides: OffsetOverrides,
    pub missing_override: MissingOverridePolicy,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            labels_enabled: true,
            default_offset: DEFAULT_OFFSET,
            manual_overrides_enabled: false,
            max_labels: DEFAULT_MAX_LABELS,
            overrides: OffsetOverrides::new(),
            missing_override: MissingOverridePolicy::Fallback,
        }
    }
}

/// 完整分析配置
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    pub detection: DetectionConfig,
    pub labels: LabelConfig,
}

impl AnalysisConfig {
    /// 校验所有取值范围
    pub fn validate(&self) -> Result<()> {
        let labels = &self.labels;
        check_offset("default offset", labels.default_offset)?;

        if !(1..=MAX_LABELS_LIMIT).contains(&labels.max_labels) {
            return Err(IrLabelError::InvalidArgument(format!(
                "Maximum number of labels must be in 1..={} (got {})",
                MAX_LABELS_LIMIT, labels.max_labels
            )));
        }

        for (key, offset) in labels.overrides.iter() {
            check_offset(&format!("offset for {} cm-1", key), *offset)?;
        }

        let detection = &self.detection;
        if detection.min_separation < 1 {
            return Err(IrLabelError::InvalidArgument(
                "Minimum peak separation must be >= 1".to_string(),
            ));
        }
        if !detection.min_prominence.is_finite() || detection.min_prominence < 0.0 {
            return Err(IrLabelError::InvalidArgument(format!(
                "Minimum prominence must be >= 0 (got {})",
                detection.min_prominence
            )));
        }
        if let Some(window) = detection.window {
            if window <= 1 {
                return Err(IrLabelError::InvalidArgument(format!(
                    "Prominence window must be > 1 (got {})",
                    window
                )));
            }
        }

        Ok(())
    }
}

fn check_offset(what: &str, offset: f64) -> Result<()> {
    if (OFFSET_MIN..=OFFSET_MAX).contains(&offset) {
        Ok(())
    } else {
        Err(IrLabelError::InvalidArgument(format!(
            "The {} must be in [{:.1}, {:.1}] (got {})",
            what, OFFSET_MIN, OFFSET_MAX, offset
        )))
    }
}
