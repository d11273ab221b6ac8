//! # 数据模型模块
//!
//! 定义数据集和背景锚点模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `background/` 和 `commands/` 使用
//! - 子模块: dataset, points

pub mod dataset;
pub mod points;

pub use dataset::{RawTable, Session, TabularDataset};
pub use points::{BackgroundPointSet, Point};
