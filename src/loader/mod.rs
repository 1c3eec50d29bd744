//! # 光谱数据加载模块
//!
//! 将表格文件（分隔文本或电子表格）解析为 [`Spectrum`]。
//!
//! ## 清洗规则
//! - 第一行默认为表头
//! - 每个单元格强制转为数字，任一单元格失败（含空单元格、NaN、inf）则整行丢弃
//! - 列数取表头宽度（无表头时取首行宽度），超出部分忽略，缺失单元格视为失败
//! - 少于 2 列 -> `InsufficientColumns`；清洗后无行 -> `EmptyDataset`
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/spectrum.rs`
//! - 子模块: delimited, spreadsheet

pub mod delimited;
pub mod spreadsheet;

use crate::error::{IrLabelError, Result};
use crate::models::Spectrum;

use std::fs;
use std::path::Path;

/// 支持的输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// 分隔文本（分隔符字节）
    Delimited(u8),
    /// Excel 工作簿（读取第一个工作表）
    Spreadsheet,
}

impl TableFormat {
    /// 从文件扩展名推断格式
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Delimited(b',')),
            "tsv" | "tab" => Ok(TableFormat::Delimited(b'\t')),
            "xlsx" | "xlsm" => Ok(TableFormat::Spreadsheet),
            _ => Err(IrLabelError::UnsupportedFormat(format!(
                "Cannot determine table format for: {} (expected .csv, .tsv or .xlsx)",
                path.display()
            ))),
        }
    }

    /// 从 MIME 类型推断格式
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        match mime.as_str() {
            "text/csv" | "application/csv" => Ok(TableFormat::Delimited(b',')),
            "text/tab-separated-values" => Ok(TableFormat::Delimited(b'\t')),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel.sheet.macroenabled.12" => Ok(TableFormat::Spreadsheet),
            _ => Err(IrLabelError::UnsupportedFormat(format!(
                "Unsupported content type: {}",
                content_type
            ))),
        }
    }
}

/// 加载选项
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// 第一行是否为表头
    pub has_header: bool,
    /// 显式指定的格式，`None` 时按扩展名推断
    pub format: Option<TableFormat>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            format: None,
        }
    }
}

/// 未清洗的数值表格
///
/// `None` 表示该单元格无法转为有限数值。
#[derive(Debug, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub width: usize,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl RawTable {
    /// 清洗：丢弃含非数值单元格的行，并转为按列存储的光谱
    pub fn into_spectrum(self) -> Result<Spectrum> {
        if self.width < 2 {
            return Err(IrLabelError::InsufficientColumns { found: self.width });
        }

        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(self.rows.len()); self.width];
        let mut dropped = 0;

        for row in &self.rows {
            let cells: Option<Vec<f64>> = (0..self.width)
                .map(|i| row.get(i).copied().flatten())
                .collect();

            match cells {
                Some(values) => {
                    for (column, value) in columns.iter_mut().zip(values) {
                        column.push(value);
                    }
                }
                None => dropped += 1,
            }
        }

        if columns[0].is_empty() {
            return Err(IrLabelError::EmptyDataset { dropped });
        }

        Spectrum::from_columns(self.headers, columns, dropped)
    }
}

/// 将文本单元格强制转为数值
///
/// 空白、无法解析以及非有限值均返回 `None`。
pub fn parse_numeric(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 从内存中的字节解析光谱
pub fn load(bytes: &[u8], format: TableFormat, options: LoadOptions) -> Result<Spectrum> {
    let table = match format {
        TableFormat::Delimited(delimiter) => {
            delimited::read_delimited(bytes, delimiter, options.has_header)?
        }
        TableFormat::Spreadsheet => spreadsheet::read_spreadsheet(bytes, options.has_header)?,
    };
    table.into_spectrum()
}

/// 读取文件并解析（未指定格式时按扩展名推断）
pub fn load_file(path: &Path, options: LoadOptions) -> Result<Spectrum> {
    let format = match options.format {
        Some(format) => format,
        None => TableFormat::from_path(path)?,
    };

    let bytes = fs::read(path).map_err(|e| IrLabelError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    load(&bytes, format, options)
}
