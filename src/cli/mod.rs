//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `plot`: 绘制一个或多个图样，可叠加 tick marks、差值图和 stepco 背景
//! - `correct`: 选取锚点并扣除背景，写出 `_bg` / `_corr` 文件
//! - `stepco`: 编辑 stepco 文件中的 BGVALU 背景点
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: plot, correct, stepco

pub mod correct;
pub mod plot;
pub mod stepco;

use crate::background::interpolate::InterpolationKind;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// lines - 粉末衍射图样背景选取工具
#[derive(Parser)]
#[command(name = "lines")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Powder pattern plotting, background picking and stepco background editing", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Plot powder patterns with optional tick marks, difference curve and background
    Plot(plot::PlotArgs),

    /// Pick background anchors and subtract the background from a pattern
    Correct(correct::CorrectArgs),

    /// Edit the BGVALU background points of a stepco instruction file
    Stepco(stepco::StepcoArgs),
}

/// 背景插值相关参数（各子命令共用）
#[derive(Args, Debug, Clone)]
pub struct BackgroundArgs {
    /// Interpolation kind: linear, nearest, zero, slinear, quadratic, cubic or a spline degree
    #[arg(long, env = "LINES_KIND", default_value = "cubic")]
    pub kind: InterpolationKind,

    /// Sampling step of the background preview curve
    #[arg(long, default_value_t = 0.01)]
    pub step: f64,

    /// Edit script replayed against the anchors (add / remove / pick / export)
    #[arg(long)]
    pub edits: Option<PathBuf>,

    /// Save the final anchors to a CSV file
    #[arg(long)]
    pub save_anchors: Option<PathBuf>,
}

/// 图片尺寸参数
#[derive(Args, Debug, Clone, Copy)]
pub struct ChartSizeArgs {
    /// Chart width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}
