//! # 背景编辑会话
//!
//! 前端（GUI、编辑脚本等）通过 `PointEditor` 接口驱动锚点编辑，
//! 核心逻辑不依赖任何具体的界面事件类型。
//!
//! ## 事件
//! - `on_add(x, y)`: 添加锚点
//! - `on_remove(indices)`: 按当前序号删除锚点
//! - `on_export()`: 写回 stepco 文件，或列出锚点
//!
//! 每次编辑之后通过 `Redraw` 回调提供锚点和重新采样的背景曲线；
//! 点数不足时曲线为 None（尚无可绘制内容）。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/points.rs`, `parsers/stepco.rs`, `parsers/edits.rs`, `plot/export.rs`

use crate::background::interpolate::InterpolationKind;
use crate::error::{LinesError, Result};
use crate::models::{BackgroundPointSet, Point};
use crate::parsers::{EditCommand, StepcoDocument};
use crate::plot::export;

use std::path::PathBuf;

/// 预览曲线的默认采样步长
pub const PREVIEW_STEP: f64 = 0.01;

/// 前端事件接口
pub trait PointEditor {
    /// 当前锚点
    fn points(&self) -> &[Point];

    /// 添加锚点
    fn on_add(&mut self, x: f64, y: f64);

    /// 删除锚点，返回被删除的点
    fn on_remove(&mut self, indices: &[usize]) -> Vec<Point>;

    /// 导出当前锚点
    fn on_export(&mut self) -> Result<ExportOutcome>;
}

/// 重绘回调
pub trait Redraw {
    fn redraw(&mut self, anchors: &[Point], curve: Option<&[(f64, f64)]>);
}

impl<F> Redraw for F
where
    F: FnMut(&[Point], Option<&[(f64, f64)]>),
{
    fn redraw(&mut self, anchors: &[Point], curve: Option<&[(f64, f64)]>) {
        self(anchors, curve)
    }
}

/// 保存最近一次重绘内容，供事后生成图表
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    pub anchors: Vec<Point>,
    pub curve: Vec<(f64, f64)>,
    pub redraws: usize,
}

impl Redraw for LatestFrame {
    fn redraw(&mut self, anchors: &[Point], curve: Option<&[(f64, f64)]>) {
        self.anchors = anchors.to_vec();
        self.curve = curve.map(|c| c.to_vec()).unwrap_or_default();
        self.redraws += 1;
    }
}

/// 导出结果
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// 写回了 stepco 文件
    Stepco {
        target: PathBuf,
        backup: Option<PathBuf>,
        points: usize,
    },
    /// 没有 stepco 文件时，列出定宽格式的锚点
    Listing(Vec<String>),
    /// 没有锚点
    Empty,
}

/// stepco 文件写回目标
#[derive(Debug, Clone)]
struct StepcoTarget {
    document: StepcoDocument,
    output: PathBuf,
}

/// 背景编辑会话
pub struct BackgroundEditor<R: Redraw> {
    points: BackgroundPointSet,
    kind: InterpolationKind,
    step: f64,
    stepco: Option<StepcoTarget>,
    redraw: R,
}

impl<R: Redraw> BackgroundEditor<R> {
    pub fn new(points: BackgroundPointSet, kind: InterpolationKind, redraw: R) -> Self {
        let mut editor = BackgroundEditor {
            points,
            kind,
            step: PREVIEW_STEP,
            stepco: None,
            redraw,
        };
        editor.refresh();
        editor
    }

    /// 导出时写回 stepco 文件（写入 output，首次导出前备份来源文件）
    pub fn with_stepco(mut self, document: StepcoDocument, output: PathBuf) -> Self {
        self.stepco = Some(StepcoTarget { document, output });
        self
    }

    /// 预览曲线采样步长
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self.refresh();
        self
    }

    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    pub fn redraw_target(&self) -> &R {
        &self.redraw
    }

    /// 结束会话，取回锚点和重绘对象
    pub fn finish(self) -> (BackgroundPointSet, R) {
        (self.points, self.redraw)
    }

    /// 重新采样背景并触发重绘
    fn refresh(&mut self) {
        let curve = match self.points.sample_range(self.step, self.kind) {
            Ok(curve) => Some(curve),
            Err(LinesError::InsufficientPoints { .. }) => None,
            Err(e) => {
                log::warn!("Background preview unavailable: {}", e);
                None
            }
        };
        self.redraw.redraw(self.points.points(), curve.as_deref());
    }
}

impl<R: Redraw> PointEditor for BackgroundEditor<R> {
    fn points(&self) -> &[Point] {
        self.points.points()
    }

    fn on_add(&mut self, x: f64, y: f64) {
        log::info!("+++    {} {}", x, y);
        self.points.add_point(x, y);
        self.refresh();
    }

    fn on_remove(&mut self, indices: &[usize]) -> Vec<Point> {
        let removed = self.points.remove_points(indices);
        for p in &removed {
            log::info!("   --- {} {}", p.x, p.y);
        }
        self.refresh();
        removed
    }

    fn on_export(&mut self) -> Result<ExportOutcome> {
        if let Some(target) = self.stepco.as_mut() {
            target.document.set_points(&self.points);
            let backup = target.document.save(&target.output)?;
            return Ok(ExportOutcome::Stepco {
                target: target.output.clone(),
                backup,
                points: self.points.len(),
            });
        }

        if self.points.is_empty() {
            return Ok(ExportOutcome::Empty);
        }

        let (xs, ys) = self.points.export();
        Ok(ExportOutcome::Listing(
            xs.into_iter()
                .zip(ys)
                .map(|(x, y)| export::format_xy_line(x, y))
                .collect(),
        ))
    }
}

/// 将编辑脚本回放到任意前端实现上，返回每次导出的结果
pub fn replay<E: PointEditor + ?Sized>(editor: &mut E, commands: &[EditCommand]) -> Result<Vec<ExportOutcome>> {
    let mut outcomes = Vec::new();

    for command in commands {
        match command {
            EditCommand::Add { x, y } => editor.on_add(*x, *y),
            EditCommand::Remove(indices) => {
                editor.on_remove(indices);
            }
            EditCommand::Pick { x, y, tolerance } => {
                let set = BackgroundPointSet::from_points(editor.points().iter().copied());
                match set.nearest_index(*x, *y, *tolerance) {
                    Some(i) => {
                        editor.on_remove(&[i]);
                    }
                    None => log::warn!("No anchor point near ({}, {})", x, y),
                }
            }
            EditCommand::Export => outcomes.push(editor.on_export()?),
        }
    }

    Ok(outcomes)
}
