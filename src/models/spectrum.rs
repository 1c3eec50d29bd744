//! # 光谱数据模型
//!
//! 定义统一的 IR 光谱数据结构（波数, 透过率）。
//!
//! ## 约定
//! - 行顺序即文件中的原始顺序，不按波数重排（峰检测依赖此顺序）
//! - 所有数值均为有限值（加载时已剔除 NaN/inf 行）
//! - 第 1 列为波数 (cm⁻¹)，第 2 列为透过率 (%T)，其余列保留但不参与计算
//!
//! ## 依赖关系
//! - 被 `loader/`, `peaks/`, `render/` 使用
//! - 无外部模块依赖

use crate::error::{IrLabelError, Result};

/// IR 光谱
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// 列名（表头；无表头时为 `column_1`, `column_2`, ...）
    headers: Vec<String>,
    /// 按列存储的数值，`columns[0]` 为波数，`columns[1]` 为透过率
    columns: Vec<Vec<f64>>,
    /// 清洗时丢弃的行数
    dropped_rows: usize,
}

impl Spectrum {
    /// 从按列存储的数据创建光谱
    ///
    /// 要求至少两列、各列等长且至少一行。
    pub fn from_columns(
        headers: Vec<String>,
        columns: Vec<Vec<f64>>,
        dropped_rows: usize,
    ) -> Result<Self> {
        if columns.len() < 2 {
            return Err(IrLabelError::InsufficientColumns {
                found: columns.len(),
            });
        }

        let n_rows = columns[0].len();
        if columns.iter().any(|c| c.len() != n_rows) {
            return Err(IrLabelError::Other(
                "Spectrum columns have different lengths".to_string(),
            ));
        }

        if n_rows == 0 {
            return Err(IrLabelError::EmptyDataset {
                dropped: dropped_rows,
            });
        }

        let headers = if headers.len() == columns.len() {
            headers
        } else {
            (1..=columns.len()).map(|i| format!("column_{}", i)).collect()
        };

        Ok(Self {
            headers,
            columns,
            dropped_rows,
        })
    }

    /// 从 (波数, 透过率) 点列创建两列光谱
    #[cfg(test)]
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        let wavenumber = pairs.iter().map(|(x, _)| *x).collect();
        let transmittance = pairs.iter().map(|(_, y)| *y).collect();
        Self::from_columns(
            vec!["Wavenumber".to_string(), "Transmittance".to_string()],
            vec![wavenumber, transmittance],
            0,
        )
    }

    /// 波数列
    pub fn wavenumber(&self) -> &[f64] {
        &self.columns[0]
    }

    /// 透过率列
    pub fn transmittance(&self) -> &[f64] {
        &self.columns[1]
    }

    /// 第 3 列起的附加列
    pub fn extra_columns(&self) -> &[Vec<f64>] {
        &self.columns[2..]
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    /// 按原始行顺序迭代 (波数, 透过率)
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavenumber()
            .iter()
            .copied()
            .zip(self.transmittance().iter().copied())
    }

    /// 波数范围 (min, max)
    pub fn wavenumber_range(&self) -> (f64, f64) {
        min_max(self.wavenumber())
    }

    /// 透过率范围 (min, max)
    pub fn transmittance_range(&self) -> (f64, f64) {
        min_max(self.transmittance())
    }

    /// 最近波数所在的行号
    ///
    /// 按 |波数 - target| 最小查找；距离相同时取最靠前的行。
    pub fn nearest_index(&self, target: f64) -> usize {
        let mut best = 0;
        let mut best_diff = f64::INFINITY;
        for (i, wn) in self.wavenumber().iter().enumerate() {
            let diff = (wn - target).abs();
            if diff < best_diff {
                best = i;
                best_diff = diff;
            }
        }
        best
    }

    /// 最近波数处的透过率（标注锚点）
    pub fn nearest_transmittance(&self, target: f64) -> f64 {
        self.transmittance()[self.nearest_index(target)]
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}
