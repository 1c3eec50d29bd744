//! # plot 子命令实现
//!
//! 从光谱表格检测吸收峰，生成带标注的光谱图与峰 JSON。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行处理（rayon，每个文件独立运行流水线）
//! - 输出 PDF / SVG / PNG
//! - 先完成全部计算与序列化，再写文件，失败时不留下部分结果
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的 PlotArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `loader/`, `pipeline.rs`, `render/`

use super::peaks::{print_peak_table, report_spectrum};
use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::plot::PlotArgs;
use crate::config::AnalysisConfig;
use crate::error::{IrLabelError, Result};
use crate::loader::{self, LoadOptions};
use crate::models::Spectrum;
use crate::pipeline::{self, Analysis};
use crate::render::export;
use crate::render::plot::{write_plot, PlotOptions};
use crate::render::PlotFormat;
use crate::utils::output;
use crate::utils::staging::StagedOutputs;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 单文件模式默认输出
pub const DEFAULT_PLOT_OUTPUT: &str = "ir_spectrum_labeled.pdf";
/// 批量模式默认输出目录
pub const DEFAULT_BATCH_OUTPUT: &str = "labeled_spectra";

/// 执行 plot 子命令
pub fn execute(args: PlotArgs) -> Result<()> {
    output::print_header("IR Spectrum Peak Labeling");

    // 参数错误在读取任何文件之前报告
    let config = args.analysis_config()?;

    if config.labels.manual_overrides_enabled {
        if config.labels.overrides.is_empty() {
            output::print_warning("Manual offsets enabled but none supplied");
        } else {
            output::print_info(&format!(
                "Using {} manual label offsets",
                config.labels.overrides.len()
            ));
        }
    }

    if args.input.is_file() {
        execute_single_file(&args, config)
    } else if args.input.is_dir() {
        execute_batch(&args, config)
    } else {
        Err(IrLabelError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &PlotArgs, config: AnalysisConfig) -> Result<()> {
    let plot_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PLOT_OUTPUT));
    let options = plot_options(args, &plot_path);

    let spectrum = loader::load_file(&args.input, args.spectrum.load_options()?)?;
    report_spectrum(&spectrum, &args.input.display().to_string());

    let analysis = label_and_write(&spectrum, &config, &plot_path, &args.json, &options)?;

    if config.labels.labels_enabled {
        print_peak_table(&analysis.peaks);
    } else {
        output::print_info("Labels disabled, peak detection skipped");
    }

    output::print_separator();
    output::print_success(&format!("Plot saved to '{}'", plot_path.display()));
    output::print_success(&format!(
        "{} peak labels saved to '{}'",
        analysis.rendering.records.len(),
        args.json.display()
    ));

    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &PlotArgs, config: AnalysisConfig) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive);

    let files = collector.collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} spectrum files", files.len()));

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BATCH_OUTPUT));

    fs::create_dir_all(&output_dir).map_err(|e| IrLabelError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let format = args.format.unwrap_or(PlotFormat::Pdf);
    output::print_info(&format!("Output format: {:?}", format));

    let batch_config = Arc::new(BatchPlotConfig {
        output_dir,
        analysis: config,
        options: PlotOptions {
            format,
            width: args.width,
            height: args.height,
            title: args.title.clone(),
        },
        load: args.spectrum.load_options()?,
        overwrite: args.overwrite,
    });

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| process_batch_file(file, &batch_config))?;

    for message in &result.outputs {
        output::print_success(message);
    }
    for message in result.skips.iter().take(10) {
        output::print_skip(message);
    }
    if result.skips.len() > 10 {
        output::print_skip(&format!("... and {} more", result.skips.len() - 10));
    }

    output::print_separator();
    output::print_success(&format!(
        "Batch complete ({} files): {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量处理配置
struct BatchPlotConfig {
    output_dir: PathBuf,
    analysis: AnalysisConfig,
    options: PlotOptions,
    load: LoadOptions,
    overwrite: bool,
}

/// 批量模式下单个文件的输出路径：`<stem>_labeled.<ext>` 与 `<stem>_peaks.json`
fn batch_outputs(input: &Path, output_dir: &Path, format: PlotFormat) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum");

    (
        output_dir.join(format!("{}_labeled.{}", stem, format.extension())),
        output_dir.join(format!("{}_peaks.json", stem)),
    )
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &PathBuf, config: &Arc<BatchPlotConfig>) -> ProcessResult {
    let (plot_path, json_path) = batch_outputs(input, &config.output_dir, config.options.format);

    if plot_path.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            plot_path.display()
        ));
    }

    let result = loader::load_file(input, config.load).and_then(|spectrum| {
        label_and_write(
            &spectrum,
            &config.analysis,
            &plot_path,
            &json_path,
            &config.options,
        )
    });

    match result {
        Ok(_) => ProcessResult::Success(format!("{} -> {}", input.display(), plot_path.display())),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 运行流水线并写出图像与 JSON
///
/// JSON 在写任何文件之前序列化完成；两个文件都写成功后才出现在目标路径。
fn label_and_write(
    spectrum: &Spectrum,
    config: &AnalysisConfig,
    plot_path: &Path,
    json_path: &Path,
    options: &PlotOptions,
) -> Result<Analysis> {
    let analysis = pipeline::run(spectrum, config)?;
    let json = export::records_to_json(&analysis.rendering.records)?;

    let mut staged = StagedOutputs::new();
    let staged_plot = staged.stage(plot_path);
    let staged_json = staged.stage(json_path);

    write_plot(spectrum, &analysis.rendering, &staged_plot, options)?;
    export::write_text(&json, &staged_json)?;
    staged.commit()?;

    Ok(analysis)
}

fn plot_options(args: &PlotArgs, plot_path: &Path) -> PlotOptions {
    PlotOptions {
        format: args
            .format
            .unwrap_or_else(|| PlotFormat::from_extension(plot_path)),
        width: args.width,
        height: args.height,
        title: args.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::models::ExportRecord;
    use clap::Parser;

    const SPECTRUM_CSV: &str = "wavenumber,T\n4000,90\n3500,40\n3000,85\n2500,30\n2000,95\n";

    fn plot_args(argv: &[&str]) -> PlotArgs {
        let mut full = vec!["irlabel", "plot"];
        full.extend_from_slice(argv);
        let cli = Cli::try_parse_from(full).unwrap();
        match cli.command {
            Commands::Plot(args) => args,
            _ => panic!("expected plot command"),
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_batch_output_names() {
        let (plot, json) = batch_outputs(
            Path::new("data/sample_a.csv"),
            Path::new("out"),
            PlotFormat::Svg,
        );
        assert_eq!(plot, Path::new("out/sample_a_labeled.svg"));
        assert_eq!(json, Path::new("out/sample_a_peaks.json"));
    }

    #[test]
    fn test_single_file_writes_plot_and_json() {
        let dir = temp_dir("irlabel_plot_single");
        let input = dir.join("scan.csv");
        fs::write(&input, SPECTRUM_CSV).unwrap();
        let plot = dir.join("scan.pdf");
        let json = dir.join("scan.json");

        let args = plot_args(&[
            input.to_str().unwrap(),
            "-o",
            plot.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
            "--min-separation",
            "1",
            "--min-prominence",
            "5",
        ]);
        execute(args).unwrap();

        let bytes = fs::read(&plot).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let records = export::read_records(&json).unwrap();
        assert_eq!(
            records,
            vec![
                ExportRecord {
                    x: 3500.0,
                    y: 40.0,
                    label: "3500.00".to_string()
                },
                ExportRecord {
                    x: 2500.0,
                    y: 30.0,
                    label: "2500.00".to_string()
                },
            ]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_strict_missing_override_writes_nothing() {
        let dir = temp_dir("irlabel_plot_strict");
        let input = dir.join("scan.csv");
        fs::write(&input, SPECTRUM_CSV).unwrap();
        let plot = dir.join("scan.pdf");
        let json = dir.join("scan.json");

        let args = plot_args(&[
            input.to_str().unwrap(),
            "-o",
            plot.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
            "--min-separation",
            "1",
            "--min-prominence",
            "5",
            "--manual",
            "--label-offset",
            "3500=8",
            "--missing-override",
            "strict",
        ]);

        assert!(matches!(
            execute(args),
            Err(IrLabelError::MissingOverride { .. })
        ));
        assert!(!plot.exists());
        assert!(!json.exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_json_write_failure_leaves_no_plot() {
        let dir = temp_dir("irlabel_plot_json_failure");
        let input = dir.join("scan.csv");
        fs::write(&input, SPECTRUM_CSV).unwrap();
        let plot = dir.join("scan.pdf");
        let json = dir.join("missing_dir").join("peaks.json");

        let args = plot_args(&[
            input.to_str().unwrap(),
            "-o",
            plot.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
            "--min-separation",
            "1",
            "--min-prominence",
            "5",
        ]);

        assert!(matches!(
            execute(args),
            Err(IrLabelError::FileWriteError { .. })
        ));
        assert!(!plot.exists());
        assert!(!json.exists());

        // 只剩输入文件，没有暂存残留
        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["scan.csv".to_string()]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_labels_disabled_writes_empty_json() {
        let dir = temp_dir("irlabel_plot_nolabels");
        let input = dir.join("scan.csv");
        fs::write(&input, SPECTRUM_CSV).unwrap();
        let plot = dir.join("scan.pdf");
        let json = dir.join("scan.json");

        let args = plot_args(&[
            input.to_str().unwrap(),
            "-o",
            plot.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
            "--no-labels",
        ]);
        execute(args).unwrap();

        assert!(plot.exists());
        assert!(export::read_records(&json).unwrap().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_batch_mode_processes_directory() {
        let dir = temp_dir("irlabel_plot_batch");
        let input_dir = dir.join("spectra");
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("a.csv"), SPECTRUM_CSV).unwrap();
        fs::write(input_dir.join("b.csv"), "x,y\nnot,numbers\n").unwrap();
        fs::write(input_dir.join("notes.txt"), "ignored").unwrap();
        let out_dir = dir.join("out");

        let args = plot_args(&[
            input_dir.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--min-separation",
            "1",
            "--min-prominence",
            "5",
            "-j",
            "2",
        ]);
        execute(args).unwrap();

        assert!(out_dir.join("a_labeled.pdf").exists());
        assert_eq!(
            export::read_records(&out_dir.join("a_peaks.json"))
                .unwrap()
                .len(),
            2
        );
        assert!(!out_dir.join("b_labeled.pdf").exists());
        assert!(!out_dir.join("b_peaks.json").exists());

        fs::remove_dir_all(&dir).ok();
    }
}
