//! # stepco 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/stepco.rs`

use super::{BackgroundArgs, ChartSizeArgs};

use clap::Args;
use std::path::PathBuf;

/// stepco 子命令参数
#[derive(Args, Debug)]
pub struct StepcoArgs {
    /// Stepco instruction file holding the BGVALU points
    #[arg(long, default_value = "stepco.inp")]
    pub xrs: PathBuf,

    /// Step scan drawn behind the anchors
    #[arg(long, default_value = "stepscan.dat")]
    pub data: PathBuf,

    /// Difference file; adds the linear background plus difference curve
    #[arg(long)]
    pub crplot: Option<PathBuf>,

    /// Where exported points are written (defaults to the stepco file itself)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub background: BackgroundArgs,

    /// Render the scan, anchors and background to an image
    #[arg(long)]
    pub plot: Option<PathBuf>,

    #[command(flatten)]
    pub size: ChartSizeArgs,
}
