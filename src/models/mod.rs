//! # 数据模型模块
//!
//! 定义光谱、峰、标注与导出记录的数据模型。
//!
//! ## 依赖关系
//! - 被 `loader/`, `peaks/`, `render/` 和 `commands/` 使用
//! - 子模块: spectrum, peak

pub mod peak;
pub mod spectrum;

pub use peak::{
    format_wavenumber, Annotation, ExportRecord, LabelPosition, PeakCandidate, WavenumberKey,
};
pub use spectrum::Spectrum;
