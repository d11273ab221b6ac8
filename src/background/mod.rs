//! # 背景模块
//!
//! 插值、背景扣除以及锚点编辑会话。
//!
//! ## 依赖关系
//! - 被 `commands/`, `models/points.rs`, `parsers/stepco.rs` 使用
//! - 子模块: spline, interpolate, corrector, editor

pub mod corrector;
pub mod editor;
pub mod interpolate;
pub mod spline;

pub use corrector::BackgroundCorrector;
pub use editor::{replay, BackgroundEditor, ExportOutcome, LatestFrame, PointEditor};
pub use interpolate::InterpolationKind;
