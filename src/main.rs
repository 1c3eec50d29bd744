//! # irlabel - IR 光谱峰标注工具
//!
//! 从 FTIR 光谱表格（CSV / TSV / XLSX）中检测透过率吸收峰，
//! 生成带波数标注的光谱图，并导出峰标注 JSON。
//!
//! ## 子命令
//! - `plot`  - 检测峰并输出标注图（PDF/SVG/PNG）与 JSON，目录输入时批量处理
//! - `peaks` - 仅检测峰，输出峰表 / CSV / 手动偏移模板
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── loader/    (表格读取)
//!   │     ├── pipeline   (峰检测 -> 标注定位 -> 标注解析)
//!   │     │     ├── peaks/   (峰检测与标注定位)
//!   │     │     └── render/  (标注解析、绘图与导出)
//!   │     └── batch/     (并行批处理)
//!   ├── config.rs   (分析配置与校验)
//!   ├── models/     (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod loader;
mod models;
mod peaks;
mod pipeline;
mod render;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
