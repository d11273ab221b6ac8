//! # 终端输出
//!
//! 统一的终端输出样式，以及锚点列表的表格显示。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` 着色，`tabled` 排版表格

use crate::models::Point;

use colored::Colorize;
use tabled::{Table, Tabled};

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印写出文件消息
pub fn print_written(what: &str, path: &std::path::Path) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        what.dimmed(),
        "->".cyan(),
        path.display()
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

#[derive(Tabled)]
struct AnchorRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "y")]
    y: String,
}

/// 锚点表格文本
pub fn anchor_table(points: &[Point]) -> String {
    let rows: Vec<AnchorRow> = points
        .iter()
        .enumerate()
        .map(|(index, p)| AnchorRow {
            index,
            x: format!("{:.6}", p.x),
            y: format!("{:.2}", p.y),
        })
        .collect();

    Table::new(&rows).to_string()
}

/// 打印锚点表格
pub fn print_anchor_table(points: &[Point]) {
    if points.is_empty() {
        print_warning("No stored coordinates.");
        return;
    }
    print_header(&format!("{} Background Anchors", points.len()));
    println!("{}", anchor_table(points));
}
