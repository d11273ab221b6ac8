//! # 一维插值
//!
//! 在背景锚点之间插值，支持线性、最近邻、阶梯以及任意次数的插值样条。
//!
//! ## 降级规则
//! - `SplineDegree(k)` 点数少于 k+1 时改用线性插值
//! - `Quadratic` / `Cubic` 点数少于 4 时改用线性插值
//! - 样条类插值遇到重复 x 时改用线性插值
//! - 少于 2 个点时返回 `InsufficientPoints` 错误
//!
//! 超出锚点范围 `[min x, max x]` 的位置返回 NaN，不做外推。
//!
//! ## 依赖关系
//! - 被 `models/points.rs`, `background/corrector.rs` 使用
//! - 使用 `background/spline.rs`

use crate::background::spline::BSpline;
use crate::error::{LinesError, Result};
use crate::models::Point;

use std::fmt;
use std::str::FromStr;

/// 插值至少需要的点数
pub const MIN_POINTS: usize = 2;

/// 插值方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationKind {
    #[default]
    Linear,
    Nearest,
    Zero,
    Slinear,
    Quadratic,
    Cubic,
    /// 指定次数的插值样条
    SplineDegree(usize),
}

impl InterpolationKind {
    /// 该插值方式不降级所需的最少点数
    pub fn min_points(self) -> usize {
        match self {
            InterpolationKind::Quadratic | InterpolationKind::Cubic => 4,
            InterpolationKind::SplineDegree(k) => k.saturating_add(1).max(MIN_POINTS),
            _ => MIN_POINTS,
        }
    }

    /// 根据可用点数决定实际使用的插值方式
    pub fn resolve(self, n_points: usize) -> Self {
        if n_points < self.min_points() {
            InterpolationKind::Linear
        } else {
            self
        }
    }

    /// 对应的样条次数；线性与最近邻返回 None
    fn spline_degree(self) -> Option<usize> {
        match self {
            InterpolationKind::Linear | InterpolationKind::Nearest => None,
            InterpolationKind::Zero => Some(0),
            InterpolationKind::Slinear => Some(1),
            InterpolationKind::Quadratic => Some(2),
            InterpolationKind::Cubic => Some(3),
            InterpolationKind::SplineDegree(k) => Some(k),
        }
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationKind::Linear => write!(f, "linear"),
            InterpolationKind::Nearest => write!(f, "nearest"),
            InterpolationKind::Zero => write!(f, "zero"),
            InterpolationKind::Slinear => write!(f, "slinear"),
            InterpolationKind::Quadratic => write!(f, "quadratic"),
            InterpolationKind::Cubic => write!(f, "cubic"),
            InterpolationKind::SplineDegree(k) => write!(f, "{}", k),
        }
    }
}

impl FromStr for InterpolationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(k) = s.parse::<usize>() {
            return Ok(InterpolationKind::SplineDegree(k));
        }

        match s.to_lowercase().as_str() {
            "linear" => Ok(InterpolationKind::Linear),
            "nearest" => Ok(InterpolationKind::Nearest),
            "zero" => Ok(InterpolationKind::Zero),
            "slinear" => Ok(InterpolationKind::Slinear),
            "quadratic" => Ok(InterpolationKind::Quadratic),
            "cubic" => Ok(InterpolationKind::Cubic),
            _ => Err(format!(
                "Invalid interpolation kind '{}'. Use linear, nearest, zero, slinear, quadratic, cubic or a spline degree (e.g. 3)",
                s
            )),
        }
    }
}

/// 实际的求值方法
#[derive(Debug, Clone)]
enum Method {
    Linear,
    /// 相邻点中点（最近邻的分界）
    Nearest(Vec<f64>),
    Previous,
    Spline(BSpline),
}

/// 锚点插值器
#[derive(Debug, Clone)]
pub struct Interpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    kind: InterpolationKind,
    method: Method,
}

impl Interpolator {
    /// 构造插值器，`points` 需按 x 非降序排列
    pub fn new(points: &[Point], requested: InterpolationKind) -> Result<Self> {
        if points.len() < MIN_POINTS {
            return Err(LinesError::InsufficientPoints {
                required: MIN_POINTS,
                found: points.len(),
            });
        }

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

        let mut kind = requested.resolve(points.len());
        if kind != requested {
            log::info!(
                "{} interpolation needs {} points, {} available: using linear",
                requested,
                requested.min_points(),
                points.len()
            );
        }

        let method = match kind {
            InterpolationKind::Linear => Method::Linear,
            InterpolationKind::Nearest => Method::Nearest(
                xs.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect(),
            ),
            _ => match kind.spline_degree() {
                Some(0) => Method::Previous,
                Some(1) | None => Method::Linear,
                Some(k) => {
                    let spline = if xs.windows(2).all(|w| w[0] < w[1]) {
                        BSpline::interpolate(&xs, &ys, k)
                    } else {
                        None
                    };
                    match spline {
                        Some(s) => {
                            log::debug!("Built degree {} spline over {} points", s.degree(), xs.len());
                            Method::Spline(s)
                        }
                        None => {
                            log::warn!(
                                "Cannot build a degree {} spline (repeated x or singular collocation system): using linear",
                                k
                            );
                            kind = InterpolationKind::Linear;
                            Method::Linear
                        }
                    }
                }
            },
        };

        Ok(Interpolator {
            xs,
            ys,
            kind,
            method,
        })
    }

    /// 实际使用的插值方式（降级之后）
    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    /// 单点求值；范围外或 NaN 返回 NaN
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let (first, last) = (self.xs[0], self.xs[n - 1]);
        if x.is_nan() || x < first || x > last {
            return f64::NAN;
        }

        match &self.method {
            Method::Linear => self.eval_linear(x),
            Method::Nearest(bounds) => self.ys[bounds.partition_point(|b| *b < x)],
            Method::Previous => {
                if x >= last {
                    self.ys[n - 1]
                } else {
                    self.ys[self.xs.partition_point(|v| *v <= x) - 1]
                }
            }
            Method::Spline(spline) => spline.eval(x),
        }
    }

    /// 批量求值
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    fn eval_linear(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = self
            .xs
            .partition_point(|v| *v <= x)
            .saturating_sub(1)
            .min(n - 2);

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);

        if x1 == x0 {
            return y1;
        }

        let t = (x - x0) / (x1 - x0);
        y0 * (1.0 - t) + y1 * t
    }
}

/// 便捷函数：在 `query_xs` 处插值
pub fn interpolate(points: &[Point], query_xs: &[f64], kind: InterpolationKind) -> Result<Vec<f64>> {
    let interpolator = Interpolator::new(points, kind)?;
    log::debug!(
        "Evaluating {} positions with {} interpolation",
        query_xs.len(),
        interpolator.kind()
    );
    Ok(interpolator.eval_many(query_xs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(xy: &[(f64, f64)]) -> Vec<Point> {
        xy.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("cubic".parse::<InterpolationKind>().unwrap(), InterpolationKind::Cubic);
        assert_eq!("Linear".parse::<InterpolationKind>().unwrap(), InterpolationKind::Linear);
        assert_eq!(
            "5".parse::<InterpolationKind>().unwrap(),
            InterpolationKind::SplineDegree(5)
        );
        assert!("spline".parse::<InterpolationKind>().is_err());
        assert!("-1".parse::<InterpolationKind>().is_err());
    }

    #[test]
    fn test_resolve_downgrades() {
        assert_eq!(InterpolationKind::Cubic.resolve(3), InterpolationKind::Linear);
        assert_eq!(InterpolationKind::Quadratic.resolve(4), InterpolationKind::Quadratic);
        assert_eq!(InterpolationKind::SplineDegree(5).resolve(5), InterpolationKind::Linear);
        assert_eq!(
            InterpolationKind::SplineDegree(5).resolve(6),
            InterpolationKind::SplineDegree(5)
        );
        assert_eq!(InterpolationKind::Nearest.resolve(2), InterpolationKind::Nearest);
    }

    #[test]
    fn test_too_few_points() {
        let result = interpolate(&points(&[(1.0, 1.0)]), &[1.0], InterpolationKind::Linear);
        assert!(matches!(
            result,
            Err(LinesError::InsufficientPoints { required: 2, found: 1 })
        ));
    }

    #[test]
    fn test_out_of_range_is_nan() {
        let p = points(&[(1.0, 10.0), (2.0, 20.0), (3.0, 15.0), (4.0, 12.0), (5.0, 30.0)]);
        for kind in [
            InterpolationKind::Linear,
            InterpolationKind::Nearest,
            InterpolationKind::Zero,
            InterpolationKind::Cubic,
            InterpolationKind::SplineDegree(4),
        ] {
            let values = interpolate(&p, &[0.999, 5.001, f64::NAN], kind).unwrap();
            assert!(values.iter().all(|v| v.is_nan()), "{}", kind);
        }
    }

    #[test]
    fn test_passes_through_anchors() {
        let p = points(&[(0.0, 3.0), (1.5, -2.0), (2.0, 7.5), (4.0, 1.0), (7.0, 2.0), (8.0, 0.0)]);
        let xs: Vec<f64> = p.iter().map(|q| q.x).collect();
        for kind in [
            InterpolationKind::Linear,
            InterpolationKind::Nearest,
            InterpolationKind::Zero,
            InterpolationKind::Slinear,
            InterpolationKind::Quadratic,
            InterpolationKind::Cubic,
            InterpolationKind::SplineDegree(5),
        ] {
            let values = interpolate(&p, &xs, kind).unwrap();
            for (v, q) in values.iter().zip(p.iter()) {
                assert!((v - q.y).abs() < 1e-9, "{} at x = {}", kind, q.x);
            }
        }
    }

    #[test]
    fn test_cubic_with_three_points_matches_linear() {
        let p = points(&[(0.0, 0.0), (1.0, 4.0), (3.0, 2.0)]);
        let xs = [0.0, 0.3, 1.0, 1.7, 2.9, 3.0];
        let cubic = interpolate(&p, &xs, InterpolationKind::Cubic).unwrap();
        let linear = interpolate(&p, &xs, InterpolationKind::Linear).unwrap();
        assert_eq!(cubic, linear);
    }

    #[test]
    fn test_linear_values() {
        let p = points(&[(0.0, 0.0), (2.0, 10.0)]);
        let values = interpolate(&p, &[0.5, 1.0, 1.5], InterpolationKind::Linear).unwrap();
        assert_eq!(values, vec![2.5, 5.0, 7.5]);
    }

    #[test]
    fn test_nearest_ties_take_lower_point() {
        let p = points(&[(0.0, 1.0), (2.0, 5.0)]);
        let values = interpolate(&p, &[0.9, 1.0, 1.1], InterpolationKind::Nearest).unwrap();
        assert_eq!(values, vec![1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_zero_is_step_function() {
        let p = points(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        let values = interpolate(&p, &[0.5, 1.0, 1.99, 2.0], InterpolationKind::Zero).unwrap();
        assert_eq!(values, vec![1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_duplicate_x_does_not_fail() {
        let p = points(&[(0.0, 0.0), (1.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 0.0)]);
        let interpolator = Interpolator::new(&p, InterpolationKind::Cubic).unwrap();
        assert_eq!(interpolator.kind(), InterpolationKind::Linear);

        let values = interpolator.eval_many(&[0.5, 1.0, 1.5]);
        assert!(values.iter().all(|v| v.is_finite()));
        assert_eq!(values[0], 0.5);
    }

    #[test]
    fn test_huge_spline_degree_downgrades() {
        let kind: InterpolationKind = "18446744073709551615".parse().unwrap();
        assert_eq!(kind, InterpolationKind::SplineDegree(usize::MAX));
        assert_eq!(kind.min_points(), usize::MAX);
        assert_eq!(kind.resolve(3), InterpolationKind::Linear);

        let p = points(&[(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)]);
        let values = interpolate(&p, &[0.5], kind).unwrap();
        assert_eq!(values, vec![1.0]);
    }
}
