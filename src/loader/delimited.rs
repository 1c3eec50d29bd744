//! # 分隔文本解析器
//!
//! 使用 `csv` 库读取逗号或制表符分隔的光谱表格。
//!
//! ## 依赖关系
//! - 被 `loader/mod.rs` 使用

use super::{parse_numeric, RawTable};
use crate::error::Result;

/// 读取分隔文本为未清洗表格
pub fn read_delimited(bytes: &[u8], delimiter: u8, has_header: bool) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let mut table = RawTable::default();

    for (i, record) in reader.records().enumerate() {
        let record = record?;

        if i == 0 {
            table.width = record.len();
            if has_header {
                table.headers = record.iter().map(|h| h.trim().to_string()).collect();
                continue;
            }
        }

        table.rows.push(record.iter().map(parse_numeric).collect());
    }

    Ok(table)
}
