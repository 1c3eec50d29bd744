//! # 统一错误处理模块
//!
//! 定义 irlabel 的所有错误类型，使用 `thiserror` 派生。
//!
//! 数值解析失败（单元格无法转为数字）不是独立的错误类型：
//! 加载时整行丢弃，只有在全部行都被丢弃时才报告 `EmptyDataset`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// irlabel 统一错误类型
#[derive(Error, Debug)]
pub enum IrLabelError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 数据加载错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File must have at least two columns of numeric data (found {found})")]
    InsufficientColumns { found: usize },

    #[error("No numeric rows left after cleaning ({dropped} rows dropped)")]
    EmptyDataset { dropped: usize },

    #[error("Failed to read spreadsheet: {0}")]
    SpreadsheetError(String),

    // ─────────────────────────────────────────────────────────────
    // 标注错误
    // ─────────────────────────────────────────────────────────────
    #[error("No manual offset supplied for peak at {key} cm-1")]
    MissingOverride { key: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化与绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, IrLabelError>;
