//! # PDF 矢量后端
//!
//! 为 `plotters` 实现 `DrawingBackend`，直接输出单页 PDF 矢量文档。
//!
//! ## 说明
//! - 1 个后端像素 = 1 pt，页面大小即图像大小
//! - 文本使用 PDF 内置的 Helvetica 字体（WinAnsiEncoding），不嵌入字体
//! - 半透明颜色按白色背景混合为不透明颜色
//!
//! ## 依赖关系
//! - 被 `render/plot.rs` 使用
//! - 使用 `plotters-backend` 的后端接口

use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 三次贝塞尔近似圆弧的系数
const KAPPA: f64 = 0.552_284_75;

/// PDF 绘图后端
pub struct PdfBackend {
    path: PathBuf,
    size: (u32, u32),
    content: String,
}

impl PdfBackend {
    /// 创建后端，`present()` 时写入 `path`
    pub fn new<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            size,
            content: String::new(),
        }
    }

    /// 生成完整的 PDF 文档字节
    pub fn to_bytes(&self) -> Vec<u8> {
        let (w, h) = self.size;
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
                w, h
            ),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                self.content.len(),
                self.content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_start = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        ));
        out.extend_from_slice(xref.as_bytes());
        out
    }

    /// 屏幕坐标 (y 向下) -> PDF 坐标 (y 向上)
    fn to_pdf(&self, (x, y): BackendCoord) -> (f64, f64) {
        (x as f64, self.size.1 as f64 - y as f64)
    }

    fn set_stroke(&mut self, color: BackendColor, width: u32) {
        let (r, g, b) = blend(color);
        self.content
            .push_str(&format!("{:.3} {:.3} {:.3} RG {} w\n", r, g, b, width));
    }

    fn set_fill(&mut self, color: BackendColor) {
        let (r, g, b) = blend(color);
        self.content
            .push_str(&format!("{:.3} {:.3} {:.3} rg\n", r, g, b));
    }

    fn path_ops<I: IntoIterator<Item = BackendCoord>>(&mut self, points: I) -> usize {
        let mut count = 0;
        for point in points {
            let (x, y) = self.to_pdf(point);
            let op = if count == 0 { "m" } else { "l" };
            self.content.push_str(&format!("{:.2} {:.2} {}\n", x, y, op));
            count += 1;
        }
        count
    }
}

impl DrawingBackend for PdfBackend {
    type ErrorType = io::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        fs::write(&self.path, self.to_bytes()).map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x, y) = self.to_pdf(point);
        self.set_fill(color);
        self.content
            .push_str(&format!("{:.2} {:.2} 1 1 re f\n", x, y - 1.0));
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width());
        self.path_ops([from, to]);
        self.content.push_str("S\n");
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let (x0, y0) = self.to_pdf((upper_left.0, bottom_right.1));
        let w = (bottom_right.0 - upper_left.0) as f64;
        let h = (bottom_right.1 - upper_left.1) as f64;

        if fill {
            self.set_fill(style.color());
        } else {
            self.set_stroke(style.color(), style.stroke_width());
        }
        self.content.push_str(&format!(
            "{:.2} {:.2} {:.2} {:.2} re {}\n",
            x0,
            y0,
            w,
            h,
            if fill { "f" } else { "S" }
        ));
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width());
        if self.path_ops(path) < 2 {
            self.content.push_str("n\n");
        } else {
            self.content.push_str("S\n");
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        self.set_fill(style.color());
        if self.path_ops(vert) < 3 {
            self.content.push_str("n\n");
        } else {
            self.content.push_str("h f\n");
        }
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let (cx, cy) = self.to_pdf(center);
        let r = radius as f64;
        let k = KAPPA * r;

        if fill {
            self.set_fill(style.color());
        } else {
            self.set_stroke(style.color(), style.stroke_width());
        }

        let mut ops = format!("{:.2} {:.2} m\n", cx + r, cy);
        for (c1, c2, end) in [
            ((cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)),
            ((cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)),
            ((cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)),
            ((cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)),
        ] {
            ops.push_str(&format!(
                "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
                c1.0, c1.1, c2.0, c2.1, end.0, end.1
            ));
        }
        ops.push_str(if fill { "f\n" } else { "S\n" });
        self.content.push_str(&ops);
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }

        let size = style.size();
        let width = text_width(text, size);
        let anchor = style.anchor();

        // 文本方向上的偏移
        let along = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        // 基线相对锚点的偏移（朝字形下方为正）
        let across = match anchor.v_pos {
            VPos::Top => size * 0.75,
            VPos::Center => size * 0.35,
            VPos::Bottom => -size * 0.2,
        };

        // 屏幕坐标中的阅读方向 u 与字形“向下”方向 v
        let (u, v): ((i32, i32), (i32, i32)) = match style.transform() {
            FontTransform::None => ((1, 0), (0, 1)),
            FontTransform::Rotate90 => ((0, 1), (-1, 0)),
            FontTransform::Rotate180 => ((-1, 0), (0, -1)),
            FontTransform::Rotate270 => ((0, -1), (1, 0)),
        };

        let sx = pos.0 as f64 + along * u.0 as f64 + across * v.0 as f64;
        let sy = pos.1 as f64 + along * u.1 as f64 + across * v.1 as f64;
        let (x, y) = (sx, self.size.1 as f64 - sy);

        let (r, g, b) = blend(color);
        self.content.push_str(&format!(
            "BT /F1 {:.1} Tf {:.3} {:.3} {:.3} rg {} {} {} {} {:.2} {:.2} Tm ({}) Tj ET\n",
            size,
            r,
            g,
            b,
            u.0,
            -u.1,
            -v.0,
            v.1,
            x,
            y,
            escape_text(text)
        ));
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        let size = style.size();
        Ok((text_width(text, size).ceil() as u32, size.ceil() as u32))
    }
}

/// 与白色背景混合后的 RGB (0-1)
fn blend(color: BackendColor) -> (f64, f64, f64) {
    let alpha = color.alpha.clamp(0.0, 1.0);
    let channel = |v: u8| (v as f64 / 255.0) * alpha + (1.0 - alpha);
    (channel(color.rgb.0), channel(color.rgb.1), channel(color.rgb.2))
}

/// Helvetica 的近似字宽（单位：字号）
fn glyph_width(c: char) -> f64 {
    match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | 'i' | 'j' | 'l' | 'I' | '\'' => 0.278,
        '(' | ')' | '-' | 'r' | 't' | 'f' | '[' | ']' | '¹' | '⁻' => 0.333,
        '0'..='9' | '$' | '_' => 0.556,
        'm' | 'M' | 'W' => 0.833,
        'w' => 0.722,
        '%' => 0.889,
        'A'..='Z' => 0.667,
        _ => 0.5,
    }
}

/// 估计文本宽度
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().map(glyph_width).sum::<f64>() * size
}

/// 转义为 PDF 字符串字面量（WinAnsiEncoding）
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            '⁻' | '−' => out.push('-'),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("1715.32"), "1715.32");
        assert_eq!(escape_text("a(b)\\"), "a\\(b\\)\\\\");
        assert_eq!(escape_text("cm⁻¹"), "cm-\\271");
        assert_eq!(escape_text("45°"), "45\\260");
        assert_eq!(escape_text("λ"), "?");
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w12 = text_width("3500.00", 12.0);
        let w24 = text_width("3500.00", 24.0);
        assert!(w12 > 0.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
    }

    #[test]
    fn test_document_structure() {
        let backend = PdfBackend::new("unused.pdf", (200, 100));
        let bytes = backend.to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/MediaBox [0 0 200 100]"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.trim_end().ends_with("%%EOF"));

        // xref 偏移指向各对象
        let xref_pos: usize = text
            .lines()
            .skip_while(|l| *l != "startxref")
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[xref_pos..].starts_with("xref"));
        let first_entry = text[xref_pos..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(text[offset..].starts_with("1 0 obj"));
    }

    /// 取出每个文本对象 Tm 前的四个矩阵分量
    fn text_matrices(content: &str) -> Vec<Vec<String>> {
        content
            .lines()
            .filter_map(|line| line.split_once(" Tm (").map(|(head, _)| head))
            .map(|head| {
                let ops: Vec<&str> = head.split_whitespace().collect();
                ops[ops.len() - 6..ops.len() - 2]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_text_matrix_uses_plain_integers() {
        let mut backend = PdfBackend::new("unused.pdf", (200, 100));
        for transform in [
            FontTransform::None,
            FontTransform::Rotate90,
            FontTransform::Rotate180,
            FontTransform::Rotate270,
        ] {
            let style = TextStyle::from(("sans-serif", 12).into_font().transform(transform));
            backend.draw_text("1715", &style, (50, 50)).unwrap();
        }

        let matrices = text_matrices(&backend.content);
        assert_eq!(
            matrices,
            vec![
                vec!["1", "0", "0", "1"],
                vec!["0", "-1", "1", "0"],
                vec!["-1", "0", "0", "-1"],
                vec!["0", "1", "-1", "0"],
            ]
        );
        assert!(!backend.content.contains("-0 "));
    }

    #[test]
    fn test_chart_to_pdf_file() {
        let path = std::env::temp_dir().join("irlabel_pdf_backend_test.pdf");
        {
            let root = PdfBackend::new(&path, (400, 300)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let mut chart = ChartBuilder::on(&root)
                .caption("Test", ("sans-serif", 20))
                .x_label_area_size(30)
                .y_label_area_size(30)
                .build_cartesian_2d(0.0..10.0, 0.0..10.0)
                .unwrap();
            chart.configure_mesh().draw().unwrap();
            chart
                .draw_series(LineSeries::new((0..10).map(|i| (i as f64, i as f64)), &BLUE))
                .unwrap();
            root.present().unwrap();
        }

        let bytes = fs::read(&path).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("(Test) Tj"));
        assert!(text.contains(" l\nS\n"));
        let _ = fs::remove_file(&path);
    }
}
