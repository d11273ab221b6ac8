//! # 绘图与导出模块
//!
//! 将数据集、锚点和背景曲线渲染为图片，并导出数值结果。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `background/` 使用
//! - 子模块: chart, export

pub mod chart;
pub mod export;

pub use chart::{render_chart, ChartData, ChartOptions};
