//! # 绘图与导出模块
//!
//! 将标注位置解析为图上的标注，并输出图像与 JSON。
//!
//! ## 子模块
//! - `plot`: 光谱图生成（倒置波数轴）
//! - `pdf`: plotters 的 PDF 矢量后端
//! - `export`: JSON / CSV 导出
//!
//! ## 依赖关系
//! - 被 `pipeline.rs`, `commands/` 使用
//! - 使用 `models/` 的 Spectrum, LabelPosition, Annotation, ExportRecord

pub mod export;
pub mod pdf;
pub mod plot;

use crate::models::{format_wavenumber, Annotation, ExportRecord, LabelPosition, Spectrum};

use clap::ValueEnum;
use std::path::Path;

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PDF vector document
    Pdf,
    /// SVG vector image
    Svg,
    /// PNG image
    Png,
}

impl PlotFormat {
    /// 从文件扩展名推断，未知时为 PDF
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("svg") => PlotFormat::Svg,
            Some("png") => PlotFormat::Png,
            _ => PlotFormat::Pdf,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Pdf => "pdf",
            PlotFormat::Svg => "svg",
            PlotFormat::Png => "png",
        }
    }
}

/// 绘图结果：图上的标注与对应的导出记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendering {
    pub annotations: Vec<Annotation>,
    pub records: Vec<ExportRecord>,
}

/// 解析标注
///
/// 锚点透过率通过最近波数查找得到，文本位于锚点下方 `offset` 处。
/// 导出记录直接由标注生成，保证与图上内容一致。
pub fn render(spectrum: &Spectrum, labels: &[LabelPosition], labels_enabled: bool) -> Rendering {
    if !labels_enabled {
        return Rendering::default();
    }

    let annotations: Vec<Annotation> = labels
        .iter()
        .map(|label| {
            let anchor = spectrum.nearest_transmittance(label.wavenumber);
            Annotation {
                wavenumber: label.wavenumber,
                anchor,
                text_y: anchor - label.vertical_offset,
                text: format_wavenumber(label.wavenumber),
            }
        })
        .collect();

    let records = annotations.iter().map(Annotation::to_record).collect();

    Rendering {
        annotations,
        records,
    }
}
