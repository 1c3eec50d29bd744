//! # IR 光谱图生成
//!
//! 使用 `plotters` 库绘制带峰标注的 IR 光谱。
//!
//! ## 功能
//! - 波数轴倒置（左高右低）
//! - 网格线
//! - 标注：锚点下方的红色文本框 + 指向锚点的引线
//! - 支持 PDF、SVG 和 PNG 输出
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 调用
//! - 使用 `render/mod.rs` 的 Rendering, `render/pdf.rs` 的 PdfBackend
//! - 使用 `plotters` 渲染图表

use super::pdf::{self, PdfBackend};
use super::{PlotFormat, Rendering};
use crate::error::{IrLabelError, Result};
use crate::models::{Annotation, Spectrum};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const LABEL_FONT_SIZE: f64 = 12.0;

/// 绘图选项
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub format: PlotFormat,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            format: PlotFormat::Pdf,
            width: 1000,
            height: 600,
            title: "IR Spectrum".to_string(),
        }
    }
}

/// 生成光谱图
pub fn write_plot(
    spectrum: &Spectrum,
    rendering: &Rendering,
    output_path: &Path,
    options: &PlotOptions,
) -> Result<()> {
    let size = (options.width, options.height);
    let annotations = &rendering.annotations;

    match options.format {
        PlotFormat::Pdf => {
            let root = PdfBackend::new(output_path, size).into_drawing_area();
            draw_spectrum_chart(&root, spectrum, annotations, &options.title)?;
            root.present().map_err(plot_error)?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            draw_spectrum_chart(&root, spectrum, annotations, &options.title)?;
            root.present().map_err(plot_error)?;
        }
        PlotFormat::Png => {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            draw_spectrum_chart(&root, spectrum, annotations, &options.title)?;
            root.present().map_err(plot_error)?;
        }
    }

    Ok(())
}

/// 绘制光谱图的核心逻辑
///
/// plotters 的坐标轴只能递增，因此以 -波数 作为 x 坐标，
/// 刻度标签再取反显示，得到左高右低的波数轴。
fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spectrum: &Spectrum,
    annotations: &[Annotation],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_error)?;

    let (x_min, x_max) = padded(spectrum.wavenumber_range(), 0.02);
    let (y_min, y_max) = padded(y_extent(spectrum, annotations), 0.05);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-x_max..-x_min, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Wavenumber (cm⁻¹)")
        .y_desc("% Transmittance")
        .x_label_formatter(&|x| format!("{:.0}", -x))
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(plot_error)?;

    // 光谱曲线（按原始行顺序连线）
    let line_color = RGBColor(0, 0, 139);
    chart
        .draw_series(LineSeries::new(
            spectrum.points().map(|(wn, t)| (-wn, t)),
            line_color.stroke_width(2),
        ))
        .map_err(plot_error)?;

    // 峰标注
    let label_style = ("sans-serif", LABEL_FONT_SIZE)
        .into_font()
        .color(&RED)
        .pos(Pos::new(HPos::Center, VPos::Top));

    for ann in annotations {
        let x = -ann.wavenumber;

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, ann.text_y), (x, ann.anchor)],
                RED.stroke_width(1),
            )))
            .map_err(plot_error)?;

        let half_w = (pdf::text_width(&ann.text, LABEL_FONT_SIZE) / 2.0).ceil() as i32 + 3;
        let h = LABEL_FONT_SIZE as i32 + 4;

        chart
            .draw_series(std::iter::once(
                EmptyElement::at((x, ann.text_y))
                    + Rectangle::new([(-half_w, 0), (half_w, h)], WHITE.filled())
                    + Rectangle::new([(-half_w, 0), (half_w, h)], RED.stroke_width(1))
                    + Text::new(ann.text.clone(), (0, 2), label_style.clone()),
            ))
            .map_err(plot_error)?;
    }

    Ok(())
}

/// y 方向需要容纳曲线、锚点与标注文本
fn y_extent(spectrum: &Spectrum, annotations: &[Annotation]) -> (f64, f64) {
    let (lo, hi) = spectrum.transmittance_range();
    annotations.iter().fold((lo, hi), |(lo, hi), ann| {
        (lo.min(ann.text_y), hi.max(ann.anchor))
    })
}

/// 按跨度比例外扩范围；跨度为 0 时外扩 1
fn padded((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    let pad = if span > 0.0 { span * fraction } else { 1.0 };
    (lo - pad, hi + pad)
}

fn plot_error<E: std::fmt::Debug>(e: E) -> IrLabelError {
    IrLabelError::PlotError(format!("{:?}", e))
}
