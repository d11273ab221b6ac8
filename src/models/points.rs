//! # 背景锚点集合
//!
//! 用户选取的 (x, y) 锚点，始终按 x 升序排列（相同 x 保持插入顺序）。
//!
//! ## 操作
//! - `add_point`: 插入后重新排序，不去重
//! - `remove_points`: 按删除前的序号批量删除
//! - `evaluate`: 委托给插值器
//! - `export`: 导出为 x / y 两个数组
//!
//! ## 依赖关系
//! - 被 `background/`, `parsers/stepco.rs`, `commands/` 使用
//! - 使用 `background/interpolate.rs`

use crate::background::interpolate::{self, InterpolationKind};
use crate::error::{LinesError, Result};
use crate::models::TabularDataset;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 单条采样曲线的最大点数
pub const MAX_SAMPLES: usize = 1_000_000;

/// 二维点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// 有序背景锚点集合
#[derive(Debug, Clone, Default)]
pub struct BackgroundPointSet {
    points: Vec<Point>,
}

impl BackgroundPointSet {
    /// 空集合
    pub fn new() -> Self {
        BackgroundPointSet::default()
    }

    /// 从任意顺序的点构造
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut set = BackgroundPointSet {
            points: points.into_iter().collect(),
        };
        set.sort();
        set
    }

    /// 用数据集的首尾两点作为初始锚点（背景扣除模式）
    pub fn from_endpoints(dataset: &TabularDataset) -> Self {
        match dataset.endpoints() {
            Some(((x1, y1), (x2, y2))) => {
                BackgroundPointSet::from_points([Point::new(x1, y1), Point::new(x2, y2)])
            }
            None => BackgroundPointSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 当前点序列（已排序）
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    // 稳定排序，相同 x 保持原有顺序
    fn sort(&mut self) {
        self.points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    /// 添加一个点
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push(Point::new(x, y));
        self.sort();
    }

    /// 按删除前的序号批量删除，返回被删除的点
    ///
    /// 越界和重复的序号被忽略。
    pub fn remove_points(&mut self, indices: &[usize]) -> Vec<Point> {
        let targets: BTreeSet<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.points.len())
            .collect();

        let mut removed = Vec::with_capacity(targets.len());
        let mut kept = Vec::with_capacity(self.points.len() - targets.len());

        for (i, point) in self.points.drain(..).enumerate() {
            if targets.contains(&i) {
                removed.push(point);
            } else {
                kept.push(point);
            }
        }

        self.points = kept;
        removed
    }

    /// 在 `query_xs` 处计算背景；范围外为 NaN
    pub fn evaluate(&self, query_xs: &[f64], kind: InterpolationKind) -> Result<Vec<f64>> {
        interpolate::interpolate(&self.points, query_xs, kind)
    }

    /// 在 [start, stop] 上以固定步长采样背景曲线，跳过 NaN
    ///
    /// 点数超过 `MAX_SAMPLES` 时返回 InvalidRange。
    pub fn sample(
        &self,
        start: f64,
        stop: f64,
        step: f64,
        kind: InterpolationKind,
    ) -> Result<Vec<(f64, f64)>> {
        if !(step > 0.0) || !(stop >= start) {
            return Err(LinesError::InvalidRange(format!(
                "{} to {} with step {}",
                start, stop, step
            )));
        }

        let count = ((stop - start) / step).floor();
        if !count.is_finite() || count >= MAX_SAMPLES as f64 {
            return Err(LinesError::InvalidRange(format!(
                "{} to {} with step {} needs more than {} samples",
                start, stop, step, MAX_SAMPLES
            )));
        }

        let n = count as usize + 1;
        let xs: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
        let ys = self.evaluate(&xs, kind)?;

        Ok(xs
            .into_iter()
            .zip(ys)
            .filter(|(_, y)| !y.is_nan())
            .collect())
    }

    /// 在整个锚点范围内采样背景曲线
    pub fn sample_range(&self, step: f64, kind: InterpolationKind) -> Result<Vec<(f64, f64)>> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.sample(first.x, last.x, step, kind),
            _ => Err(LinesError::InsufficientPoints {
                required: 2,
                found: 0,
            }),
        }
    }

    /// 查找距 (x, y) 最近的点，距离超过 tolerance 时返回 None
    pub fn nearest_index(&self, x: f64, y: f64, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p.x - x).hypot(p.y - y)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// 导出为平行的 x / y 数组
    pub fn export(&self) -> (Vec<f64>, Vec<f64>) {
        self.points.iter().map(|p| (p.x, p.y)).unzip()
    }
}
