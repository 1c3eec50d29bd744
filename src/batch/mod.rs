//! # 批量处理模块
//!
//! 对一个目录中的多条光谱并行执行标注流水线。
//!
//! ## 功能
//! - 收集匹配文件列表
//! - 并行处理（每个文件独立，互不共享状态）
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchRunner, ProcessResult};
