//! # 电子表格解析器
//!
//! 使用 `calamine` 读取 .xlsx 工作簿的第一个工作表。
//!
//! ## 依赖关系
//! - 被 `loader/mod.rs` 使用

use super::{parse_numeric, RawTable};
use crate::error::{IrLabelError, Result};

use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// 读取工作簿为未清洗表格
pub fn read_spreadsheet(bytes: &[u8], has_header: bool) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| IrLabelError::SpreadsheetError(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IrLabelError::SpreadsheetError("Workbook has no worksheets".to_string()))?
        .map_err(|e| IrLabelError::SpreadsheetError(e.to_string()))?;

    let mut table = RawTable {
        width: range.width(),
        ..RawTable::default()
    };

    for (i, row) in range.rows().enumerate() {
        if i == 0 && has_header {
            table.headers = row.iter().map(|c| c.to_string().trim().to_string()).collect();
            continue;
        }
        table.rows.push(row.iter().map(cell_to_f64).collect());
    }

    Ok(table)
}

/// 将单元格强制转为有限数值
fn cell_to_f64(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Data::String(s) => return parse_numeric(s),
        _ => return None,
    };
    value.is_finite().then_some(value)
}
