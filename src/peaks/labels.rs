//! # 标注定位
//!
//! 为每个选中的峰确定标注的垂直偏移。
//!
//! ## 规则
//! - 未启用手动模式：所有峰使用默认偏移
//! - 启用手动模式：按两位小数的波数键查找偏移；
//!   缺失时按 `MissingOverridePolicy` 回退到默认偏移或报错
//!
//! 标注锚点的透过率不在此处确定，而是在绘制/导出时
//! 通过最近波数查找从光谱中重新解析。
//!
//! ## 依赖关系
//! - 被 `pipeline.rs` 调用
//! - 使用 `config.rs` 的 LabelConfig

use crate::config::{LabelConfig, MissingOverridePolicy};
use crate::error::{IrLabelError, Result};
use crate::models::{LabelPosition, PeakCandidate};

/// 计算所有峰的标注位置（顺序与输入一致）
pub fn position_labels(peaks: &[PeakCandidate], config: &LabelConfig) -> Result<Vec<LabelPosition>> {
    peaks
        .iter()
        .map(|peak| {
            let vertical_offset = if config.manual_overrides_enabled {
                manual_offset(peak, config)?
            } else {
                config.default_offset
            };
            Ok(LabelPosition {
                wavenumber: peak.wavenumber,
                vertical_offset,
            })
        })
        .collect()
}

fn manual_offset(peak: &PeakCandidate, config: &LabelConfig) -> Result<f64> {
    let key = peak.key();
    match (config.overrides.get(&key), config.missing_override) {
        (Some(offset), _) => Ok(offset),
        (None, MissingOverridePolicy::Fallback) => Ok(config.default_offset),
        (None, MissingOverridePolicy::Strict) => Err(IrLabelError::MissingOverride {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WavenumberKey;

    fn peak(wavenumber: f64, rank: usize) -> PeakCandidate {
        PeakCandidate {
            index: rank,
            wavenumber,
            transmittance: 40.0,
            prominence: 10.0,
            rank,
        }
    }

    #[test]
    fn test_default_offset_for_all() {
        let peaks = [peak(3500.0, 1), peak(2500.0, 2)];
        let mut config = LabelConfig::default();
        config.overrides.insert(WavenumberKey::new(3500.0), 12.0);

        let labels = position_labels(&peaks, &config).unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|l| l.vertical_offset == 5.0));
        assert_eq!(labels[0].wavenumber, 3500.0);
        assert_eq!(labels[1].wavenumber, 2500.0);
    }

    #[test]
    fn test_manual_overrides_with_fallback() {
        let peaks = [peak(3500.004, 1), peak(2500.0, 2)];
        let mut config = LabelConfig {
            manual_overrides_enabled: true,
            default_offset: 4.0,
            ..LabelConfig::default()
        };
        config.overrides.insert(WavenumberKey::parse("3500").unwrap(), 12.0);

        let labels = position_labels(&peaks, &config).unwrap();
        assert_eq!(labels[0].vertical_offset, 12.0);
        assert_eq!(labels[0].wavenumber, 3500.004);
        assert_eq!(labels[1].vertical_offset, 4.0);
    }

    #[test]
    fn test_manual_overrides_strict() {
        let peaks = [peak(3500.0, 1), peak(2500.0, 2)];
        let mut config = LabelConfig {
            manual_overrides_enabled: true,
            missing_override: MissingOverridePolicy::Strict,
            ..LabelConfig::default()
        };
        config.overrides.insert(WavenumberKey::new(3500.0), 12.0);

        let err = position_labels(&peaks, &config).unwrap_err();
        match err {
            IrLabelError::MissingOverride { key } => assert_eq!(key, "2500.00"),
            other => panic!("unexpected error: {other}"),
        }

        config.overrides.insert(WavenumberKey::new(2500.0), 2.0);
        assert!(position_labels(&peaks, &config).is_ok());
    }

    #[test]
    fn test_no_peaks() {
        let labels = position_labels(&[], &LabelConfig::default()).unwrap();
        assert!(labels.is_empty());
    }
}
