//! # correct 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/correct.rs`

use super::{BackgroundArgs, ChartSizeArgs};

use clap::Args;
use std::path::PathBuf;

/// correct 子命令参数
#[derive(Args, Debug)]
pub struct CorrectArgs {
    /// Pattern to correct (x y [esd])
    pub file: PathBuf,

    /// Constant added to every corrected intensity
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Seed anchors from a CSV file (x,y) instead of the pattern end points
    #[arg(long)]
    pub anchors: Option<PathBuf>,

    #[command(flatten)]
    pub background: BackgroundArgs,

    /// Render the pattern, anchors and background to an image
    #[arg(long)]
    pub plot: Option<PathBuf>,

    #[command(flatten)]
    pub size: ChartSizeArgs,
}
