//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `plot`: 检测峰、生成带标注的光谱图与 JSON
//! - `peaks`: 仅检测峰并输出峰表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, plot, peaks

pub mod common;
pub mod peaks;
pub mod plot;

use clap::{Parser, Subcommand};

/// irlabel - IR 光谱峰标注工具
#[derive(Parser)]
#[command(name = "irlabel")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Detect absorption peaks in IR spectra and produce labeled plots", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Detect peaks and write a labeled spectrum plot plus peak JSON
    Plot(plot::PlotArgs),

    /// Detect peaks and print the peak table
    Peaks(peaks::PeaksArgs),
}
