//! # crplot.dat 差值图解析器
//!
//! 精修程序输出的 观测 / 计算 / 差值 图样。
//!
//! ## 格式说明
//! ```text
//! <header line 1>
//! <header line 2>
//! 2theta  observed  calculated  difference
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs`, `plot/chart.rs` 使用
//! - 使用 `models/points.rs` 计算 背景 + 差值

use crate::background::interpolate::InterpolationKind;
use crate::error::{LinesError, Result};
use crate::models::BackgroundPointSet;

use std::fs;
use std::path::Path;

/// 跳过的表头行数
const HEADER_LINES: usize = 2;

/// 观测 / 计算 / 差值 图样
#[derive(Debug, Clone, Default)]
pub struct DifferencePattern {
    pub two_theta: Vec<f64>,
    pub observed: Vec<f64>,
    pub calculated: Vec<f64>,
    pub difference: Vec<f64>,
}

impl DifferencePattern {
    pub fn len(&self) -> usize {
        self.two_theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.two_theta.is_empty()
    }

    /// 差值曲线的最大值（绘图时用于下移差值曲线）
    pub fn max_difference(&self) -> f64 {
        self.difference
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// 线性背景 + 差值，用于与上一轮背景比较；背景范围外的点被跳过
    pub fn background_plus_difference(&self, anchors: &BackgroundPointSet) -> Result<Vec<(f64, f64)>> {
        let background = anchors.evaluate(&self.two_theta, InterpolationKind::Linear)?;

        Ok(self
            .two_theta
            .iter()
            .zip(background.iter().zip(self.difference.iter()))
            .filter(|(_, (bg, _))| !bg.is_nan())
            .map(|(tt, (bg, dif))| (*tt, bg + dif))
            .collect())
    }
}

/// 从字符串内容解析
pub fn parse_crplot_content(content: &str, source_name: &str) -> Result<DifferencePattern> {
    let mut pattern = DifferencePattern::default();

    for (line_no, line) in content.lines().enumerate().skip(HEADER_LINES) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        if parts.len() < 4 {
            return Err(LinesError::format(
                source_name,
                line_no + 1,
                format!("expected 4 columns (2theta obs calc diff), found {}", parts.len()),
            ));
        }

        let mut values = [0.0_f64; 4];
        for (value, token) in values.iter_mut().zip(parts.iter()) {
            *value = token.parse().map_err(|_| {
                LinesError::format(source_name, line_no + 1, format!("not a number: '{}'", token))
            })?;
        }

        pattern.two_theta.push(values[0]);
        pattern.observed.push(values[1]);
        pattern.calculated.push(values[2]);
        pattern.difference.push(values[3]);
    }

    if pattern.is_empty() {
        return Err(LinesError::format(source_name, HEADER_LINES, "no data rows"));
    }

    Ok(pattern)
}

/// 读取 crplot.dat 文件
pub fn parse_crplot_file(path: &Path) -> Result<DifferencePattern> {
    let content = fs::read_to_string(path).map_err(|e| LinesError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_crplot_content(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    const CRPLOT: &str = r#" crplot output
    2theta obs clc dif
  10.00   120.0   118.0    2.0
  10.02   125.0   119.0    6.0
  10.04   119.0   121.0   -2.0
"#;

    #[test]
    fn test_parse_crplot() {
        let pattern = parse_crplot_content(CRPLOT, "crplot.dat").unwrap();
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.two_theta[1], 10.02);
        assert_eq!(pattern.difference, vec![2.0, 6.0, -2.0]);
        assert_eq!(pattern.max_difference(), 6.0);
    }

    #[test]
    fn test_short_row_rejected() {
        let content = "h1\nh2\n10.0 1.0 2.0\n";
        assert!(parse_crplot_content(content, "crplot.dat").is_err());
    }

    #[test]
    fn test_background_plus_difference() {
        let pattern = parse_crplot_content(CRPLOT, "crplot.dat").unwrap();
        let anchors = BackgroundPointSet::from_points([Point::new(10.01, 100.0), Point::new(10.05, 100.0)]);
        let curve = pattern.background_plus_difference(&anchors).unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].0, 10.02);
        assert!((curve[0].1 - 106.0).abs() < 1e-9);
        assert!((curve[1].1 - 98.0).abs() < 1e-9);
    }
}
