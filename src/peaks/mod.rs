//! # 峰检测与标注模块
//!
//! ## 子模块
//! - `detector`: 吸收峰检测（局部极小值、间距、显著度）
//! - `labels`: 标注偏移定位
//!
//! ## 依赖关系
//! - 被 `pipeline.rs` 使用
//! - 使用 `models/`, `config.rs`

pub mod detector;
pub mod labels;

pub use detector::{detect_peaks, PeakParams};
pub use labels::position_labels;
