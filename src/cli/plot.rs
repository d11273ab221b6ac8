//! # plot 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plot.rs`

use super::ChartSizeArgs;
use crate::background::interpolate::InterpolationKind;

use clap::Args;
use std::path::PathBuf;

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Data files (whitespace-separated columns: x y [esd], or a single y column)
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Output image (.png or .svg)
    #[arg(short, long, default_value = "lines.png")]
    pub output: PathBuf,

    /// Tick mark file; peak positions are read from the 4th column
    #[arg(long)]
    pub ticks: Option<PathBuf>,

    /// Difference file with observed, calculated and difference curves
    #[arg(long)]
    pub crplot: Option<PathBuf>,

    /// Shift each dataset by its index so overlapping curves stay apart
    #[arg(long, default_value_t = false)]
    pub shift: bool,

    /// Stepco instruction file whose BGVALU points are drawn as background
    #[arg(long)]
    pub xrs: Option<PathBuf>,

    /// Interpolation kind for the background curve
    #[arg(long, env = "LINES_KIND", default_value = "cubic")]
    pub kind: InterpolationKind,

    /// Sampling step of the background curve
    #[arg(long, default_value_t = 0.01)]
    pub step: f64,

    #[command(flatten)]
    pub size: ChartSizeArgs,
}
