//! # peaks 子命令实现
//!
//! 加载光谱、检测峰并打印峰表。
//!
//! ## 功能
//! - 峰表终端输出（tabled）
//! - 可选 CSV 峰表导出
//! - 可选手动偏移模板（供 `plot --overrides-file` 使用）
//!
//! ## 依赖关系
//! - 使用 `cli/peaks.rs` 定义的 PeaksArgs
//! - 使用 `loader/`, `pipeline.rs`, `render/export.rs`
//! - 使用 `utils/staging.rs` 保证输出要么全部写出要么全不写

use crate::cli::peaks::PeaksArgs;
use crate::error::Result;
use crate::loader;
use crate::models::{PeakCandidate, Spectrum};
use crate::pipeline;
use crate::render::export;
use crate::utils::output;
use crate::utils::staging::StagedOutputs;

use tabled::{Table, Tabled};

/// 执行 peaks 子命令
pub fn execute(args: PeaksArgs) -> Result<()> {
    output::print_header("IR Peak Detection");

    let config = args.analysis_config()?;
    let spectrum = loader::load_file(&args.input, args.spectrum.load_options()?)?;
    report_spectrum(&spectrum, &args.input.display().to_string());

    let peaks = pipeline::detect(&spectrum, &config)?;

    // 所有输出内容先生成，再写文件
    let template = match &args.overrides_template {
        Some(_) => {
            let overrides = export::overrides_template(&peaks, config.labels.default_offset);
            Some(overrides.to_json_string()?)
        }
        None => None,
    };

    print_peak_table(&peaks);

    let mut staged = StagedOutputs::new();
    if let Some(ref path) = args.csv {
        export::peaks_to_csv(&peaks, &staged.stage(path))?;
    }
    if let (Some(path), Some(text)) = (&args.overrides_template, &template) {
        export::write_text(text, &staged.stage(path))?;
    }
    staged.commit()?;

    if let Some(ref path) = args.csv {
        output::print_success(&format!("Peak table saved to '{}'", path.display()));
    }
    if let Some(ref path) = args.overrides_template {
        output::print_success(&format!(
            "Offset template saved to '{}' ({} peaks)",
            path.display(),
            peaks.len()
        ));
    }

    Ok(())
}

/// 打印光谱加载信息
pub(crate) fn report_spectrum(spectrum: &Spectrum, source: &str) {
    let (wn_min, wn_max) = spectrum.wavenumber_range();
    output::print_success(&format!(
        "Loaded '{}': {} points, {:.1}-{:.1} cm-1",
        source,
        spectrum.len(),
        wn_min,
        wn_max
    ));

    if spectrum.dropped_rows() > 0 {
        output::print_warning(&format!(
            "Dropped {} rows with non-numeric values",
            spectrum.dropped_rows()
        ));
    }

    if !spectrum.extra_columns().is_empty() {
        output::print_info(&format!(
            "Ignoring {} extra columns (using '{}' and '{}')",
            spectrum.extra_columns().len(),
            header_or(spectrum, 0, "wavenumber"),
            header_or(spectrum, 1, "transmittance")
        ));
    }
}

fn header_or<'a>(spectrum: &'a Spectrum, index: usize, fallback: &'a str) -> &'a str {
    spectrum
        .headers()
        .get(index)
        .map(String::as_str)
        .filter(|h| !h.is_empty())
        .unwrap_or(fallback)
}

/// 打印峰表
pub(crate) fn print_peak_table(peaks: &[PeakCandidate]) {
    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "Rank")]
        rank: usize,
        #[tabled(rename = "Wavenumber (cm-1)")]
        wavenumber: String,
        #[tabled(rename = "T (%)")]
        transmittance: String,
        #[tabled(rename = "Prominence")]
        prominence: String,
    }

    if peaks.is_empty() {
        output::print_warning("No peaks detected");
        return;
    }

    let rows: Vec<PeakRow> = peaks
        .iter()
        .map(|p| PeakRow {
            rank: p.rank,
            wavenumber: format!("{:.2}", p.wavenumber),
            transmittance: format!("{:.2}", p.transmittance),
            prominence: format!("{:.2}", p.prominence),
        })
        .collect();

    output::print_header(&format!("{} Detected Peaks", rows.len()));
    println!("{}", Table::new(&rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::config::OffsetOverrides;
    use clap::Parser;
    use std::fs;

    fn write_spectrum(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("scan.csv");
        fs::write(
            &path,
            "wavenumber,T\n4000,90\n3500,40\n3000,85\n2500,30\n2000,95\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_peaks_writes_csv_and_template() {
        let dir = std::env::temp_dir().join("irlabel_peaks_cmd");
        fs::create_dir_all(&dir).unwrap();
        let input = write_spectrum(&dir);
        let csv_path = dir.join("peaks.csv");
        let template_path = dir.join("offsets.json");

        let cli = Cli::try_parse_from([
            "irlabel",
            "peaks",
            input.to_str().unwrap(),
            "--min-separation",
            "1",
            "--min-prominence",
            "5",
            "--csv",
            csv_path.to_str().unwrap(),
            "--overrides-template",
            template_path.to_str().unwrap(),
            "--offset",
            "7",
        ])
        .unwrap();
        let Commands::Peaks(args) = cli.command else {
            panic!("expected peaks command");
        };
        execute(args).unwrap();

        let csv_text = fs::read_to_string(&csv_path).unwrap();
        assert!(csv_text.starts_with("rank,wavenumber,transmittance,prominence,index"));
        assert!(csv_text.contains("1,3500.00,40.0000"));

        let template = OffsetOverrides::from_json_file(&template_path).unwrap();
        assert_eq!(template.len(), 2);
        assert!(template.iter().all(|(_, offset)| *offset == 7.0));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_template_write_failure_leaves_no_csv() {
        let dir = std::env::temp_dir().join("irlabel_peaks_cmd_failure");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let input = write_spectrum(&dir);
        let csv_path = dir.join("peaks.csv");
        let template_path = dir.join("missing_dir").join("offsets.json");

        let cli = Cli::try_parse_from([
            "irlabel",
            "peaks",
            input.to_str().unwrap(),
            "--min-separation",
            "1",
            "--min-prominence",
            "5",
            "--csv",
            csv_path.to_str().unwrap(),
            "--overrides-template",
            template_path.to_str().unwrap(),
        ])
        .unwrap();
        let Commands::Peaks(args) = cli.command else {
            panic!("expected peaks command");
        };

        assert!(execute(args).is_err());
        assert!(!csv_path.exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
