//! # 分析流水线
//!
//! 对一条光谱执行：峰检测 -> 标注定位 -> 标注解析。
//!
//! 纯计算、单线程，不写任何文件；相同输入与配置得到完全相同的结果。
//! 文件输出由调用方在流水线成功后进行，失败时不会留下部分结果。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `peaks/`, `render/`, `config.rs`

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{LabelPosition, PeakCandidate, Spectrum};
use crate::peaks::{detect_peaks, position_labels, PeakParams};
use crate::render::{render, Rendering};

/// 一次分析的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub peaks: Vec<PeakCandidate>,
    pub labels: Vec<LabelPosition>,
    pub rendering: Rendering,
}

/// 只做峰检测
pub fn detect(spectrum: &Spectrum, config: &AnalysisConfig) -> Result<Vec<PeakCandidate>> {
    config.validate()?;
    let params = PeakParams::new(&config.detection, config.labels.max_labels);
    Ok(detect_peaks(spectrum, &params))
}

/// 执行完整流水线
///
/// 关闭标注时不做峰检测，结果为空。
pub fn run(spectrum: &Spectrum, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;

    if !config.labels.labels_enabled {
        return Ok(Analysis::default());
    }

    let peaks = detect(spectrum, config)?;
    let labels = position_labels(&peaks, &config.labels)?;
    let rendering = render(spectrum, &labels, config.labels.labels_enabled);

    Ok(Analysis {
        peaks,
        labels,
        rendering,
    })
}
