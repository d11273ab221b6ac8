//! # lines - 粉末衍射图样背景选取工具
//!
//! 绘制衍射图样，选取背景锚点，扣除背景或改写 stepco 文件中的 BGVALU 背景点。
//!
//! ## 子命令
//! - `plot` - 绘制图样、tick marks、差值曲线和背景
//! - `correct` - 背景扣除，写出 `_bg` / `_corr` 文件
//! - `stepco` - 编辑 stepco 文件中的背景点
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/    (格式解析器)
//!   │     ├── background/ (插值、背景扣除、编辑会话)
//!   │     ├── plot/       (绘图与导出)
//!   │     └── models/     (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod background;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod plot;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
