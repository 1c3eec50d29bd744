//! # 峰数据导出
//!
//! ## 支持格式
//! - JSON: 标注记录数组 `[{x, y, label}, ...]`（2 空格缩进）
//! - CSV: 检测到的峰表（rank, wavenumber, transmittance, prominence, index）
//! - 手动偏移模板: `{"<波数>": 偏移, ...}`
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `serde_json` 和 `csv` 库写入文件

use crate::config::OffsetOverrides;
use crate::error::{IrLabelError, Result};
use crate::models::{ExportRecord, PeakCandidate};

use std::fs;
use std::path::Path;

/// 序列化标注记录
pub fn records_to_json(records: &[ExportRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// 读取导出的标注记录
#[cfg(test)]
pub(crate) fn read_records(path: &Path) -> Result<Vec<ExportRecord>> {
    let text = fs::read_to_string(path).map_err(|e| IrLabelError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// 写出文本文件
pub fn write_text(text: &str, output_path: &Path) -> Result<()> {
    fs::write(output_path, text).map_err(|e| IrLabelError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}

/// 导出峰表为 CSV 格式
pub fn peaks_to_csv(peaks: &[PeakCandidate], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["rank", "wavenumber", "transmittance", "prominence", "index"])?;

    for peak in peaks {
        wtr.write_record(&[
            peak.rank.to_string(),
            format!("{:.2}", peak.wavenumber),
            format!("{:.4}", peak.transmittance),
            format!("{:.4}", peak.prominence),
            peak.index.to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| IrLabelError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 生成手动偏移模板：每个峰都使用默认偏移
pub fn overrides_template(peaks: &[PeakCandidate], default_offset: f64) -> OffsetOverrides {
    let mut overrides = OffsetOverrides::new();
    for peak in peaks {
        overrides.insert(peak.key(), default_offset);
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Annotation, LabelPosition, Spectrum, WavenumberKey};
    use crate::render::render;

    #[test]
    fn test_json_shape() {
        let records = vec![ExportRecord {
            x: 3500.0,
            y: 40.0,
            label: "3500.00".to_string(),
        }];
        let json = records_to_json(&records).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"x\": 3500.0,\n    \"y\": 40.0,\n    \"label\": \"3500.00\"\n  }\n]"
        );
        assert_eq!(records_to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_export_round_trip_matches_plot() {
        let spectrum = Spectrum::from_pairs(&[
            (4000.0, 90.0),
            (3500.0, 40.0),
            (3000.0, 85.0),
            (2500.0, 30.0),
            (2000.0, 95.0),
        ])
        .unwrap();
        let labels = [
            LabelPosition {
                wavenumber: 3500.0,
                vertical_offset: 5.0,
            },
            LabelPosition {
                wavenumber: 2480.7,
                vertical_offset: 8.0,
            },
        ];
        let rendering = render(&spectrum, &labels, true);

        let path = std::env::temp_dir().join("irlabel_export_round_trip.json");
        write_text(&records_to_json(&rendering.records).unwrap(), &path).unwrap();
        let back = read_records(&path).unwrap();
        let _ = fs::remove_file(&path);

        let drawn: Vec<ExportRecord> = rendering.annotations.iter().map(Annotation::to_record).collect();
        assert_eq!(back, drawn);
        assert_eq!(back[1].label, "2480.70");
        assert_eq!(back[1].y, 30.0);
    }

    #[test]
    fn test_peaks_csv() {
        let peaks = [PeakCandidate {
            index: 1,
            wavenumber: 3500.0,
            transmittance: 40.0,
            prominence: 45.0,
            rank: 1,
        }];
        let path = std::env::temp_dir().join("irlabel_peaks_test.csv");
        peaks_to_csv(&peaks, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("rank,wavenumber,transmittance,prominence,index")
        );
        assert_eq!(lines.next(), Some("1,3500.00,40.0000,45.0000,1"));
    }

    #[test]
    fn test_overrides_template() {
        let peaks = [
            PeakCandidate {
                index: 1,
                wavenumber: 3500.0,
                transmittance: 40.0,
                prominence: 45.0,
                rank: 1,
            },
            PeakCandidate {
                index: 3,
                wavenumber: 1715.456,
                transmittance: 30.0,
                prominence: 60.0,
                rank: 2,
            },
        ];
        let template = overrides_template(&peaks, 5.0);
        assert_eq!(template.len(), 2);
        assert_eq!(template.get(&WavenumberKey::new(1715.46)), Some(5.0));

        let json = template.to_json_string().unwrap();
        assert!(json.contains("\"1715.46\": 5.0"));
    }
}
