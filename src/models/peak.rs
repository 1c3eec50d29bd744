//! # 峰与标注数据模型
//!
//! ## 依赖关系
//! - 被 `peaks/`, `render/`, `pipeline.rs` 使用
//! - 使用 `serde` 进行 JSON 序列化

use serde::{Deserialize, Serialize};
use std::fmt;

/// 吸收峰候选（透过率局部极小值）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    /// 在光谱中的原始行号
    pub index: usize,
    /// 波数 (cm⁻¹)
    pub wavenumber: f64,
    /// 透过率 (%T)
    pub transmittance: f64,
    /// 峰的显著度（%T）
    pub prominence: f64,
    /// 最终排序（波数降序）中的位置，从 1 开始
    pub rank: usize,
}

impl PeakCandidate {
    pub fn key(&self) -> WavenumberKey {
        WavenumberKey::new(self.wavenumber)
    }
}

/// 标注位置：波数 + 垂直偏移
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPosition {
    pub wavenumber: f64,
    pub vertical_offset: f64,
}

/// 以两位小数格式化的波数，用作手动偏移表的键
///
/// 避免浮点数直接作为键时的相等性问题。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WavenumberKey(String);

impl WavenumberKey {
    pub fn new(wavenumber: f64) -> Self {
        Self(format_wavenumber(wavenumber))
    }

    /// 解析用户输入的键（如 "3500" 或 "3500.004"），统一为两位小数
    pub fn parse(input: &str) -> Option<Self> {
        let value: f64 = input.trim().parse().ok()?;
        value.is_finite().then(|| Self::new(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WavenumberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 波数标注文本：固定两位小数
pub fn format_wavenumber(wavenumber: f64) -> String {
    format!("{:.2}", wavenumber)
}

/// 图上的一个标注
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// 标注所指的波数
    pub wavenumber: f64,
    /// 最近波数查找得到的透过率（箭头指向的位置）
    pub anchor: f64,
    /// 文本所在的 y 坐标（anchor - offset）
    pub text_y: f64,
    /// 标注文本
    pub text: String,
}

impl Annotation {
    /// 对应的导出记录（与绘制内容一致）
    pub fn to_record(&self) -> ExportRecord {
        ExportRecord {
            x: self.wavenumber,
            y: self.anchor,
            label: self.text.clone(),
        }
    }
}

/// JSON 导出记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub x: f64,
    pub y: f64,
    pub label: String,
}
