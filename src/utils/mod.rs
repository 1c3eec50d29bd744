//! # 工具函数模块
//!
//! 提供美化输出、进度条与输出文件暂存。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/` 模块使用
//! - 子模块: output, progress, staging

pub mod output;
pub mod progress;
pub mod staging;
