//! # 图样与背景绘图
//!
//! 使用 `plotters` 绘制衍射图样、背景锚点和插值背景曲线。
//!
//! ## 功能
//! - 多个数据集按创建序号着色（bgrcmyk 循环），可选逐个平移
//! - 可选 tick marks (hkl.dat)
//! - 可选 观测 / 计算 / 差值 曲线 (crplot.dat)
//! - 锚点、背景曲线、背景 + 差值
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `background/editor.rs` 调用
//! - 使用 `plotters` 渲染图表

use crate::error::{LinesError, Result};
use crate::models::{Point, TabularDataset};
use crate::parsers::DifferencePattern;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 数据集颜色循环: b g r c m y k
const SERIES_COLORS: [RGBColor; 7] = [
    RGBColor(0, 0, 255),
    RGBColor(0, 128, 0),
    RGBColor(255, 0, 0),
    RGBColor(0, 191, 191),
    RGBColor(191, 0, 191),
    RGBColor(191, 191, 0),
    RGBColor(0, 0, 0),
];

/// 平移模式下每个序号的偏移（占坐标轴跨度的比例）
const SHIFT_FRACTION: f64 = 0.02;

/// 按数据集序号取颜色
pub fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// 图表选项
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// 按序号平移各数据集，便于区分重叠曲线
    pub shift: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            title: "lines".to_string(),
            width: 1200,
            height: 800,
            shift: false,
        }
    }
}

/// 需要绘制的全部内容
#[derive(Debug, Default)]
pub struct ChartData<'a> {
    pub datasets: Vec<&'a TabularDataset>,
    pub ticks: Option<&'a TabularDataset>,
    pub difference: Option<&'a DifferencePattern>,
    pub anchors: &'a [Point],
    pub background: &'a [(f64, f64)],
    pub background_plus_difference: &'a [(f64, f64)],
}

/// 绘图范围
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn empty() -> Self {
        Bounds {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    fn is_valid(&self) -> bool {
        self.x_min.is_finite() && self.y_min.is_finite()
    }

    /// 两端各留 5% 空白，避免零跨度
    fn padded(&self) -> Self {
        let pad = |lo: f64, hi: f64| {
            let span = if hi > lo { hi - lo } else { lo.abs().max(1.0) };
            (lo - 0.05 * span, hi + 0.05 * span)
        };
        let (x_min, x_max) = pad(self.x_min, self.x_max);
        let (y_min, y_max) = pad(self.y_min, self.y_max);
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

fn plot_err<E: std::fmt::Debug>(e: E) -> LinesError {
    LinesError::PlotError(format!("{:?}", e))
}

/// 生成图表，按扩展名选择 PNG / SVG
pub fn render_chart(data: &ChartData, output_path: &Path, options: &ChartOptions) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_chart(&root, data, options)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_chart(&root, data, options)?;
        root.present().map_err(plot_err)?;
    }

    Ok(())
}

/// 数据集在平移模式下的偏移量
fn dataset_offset(index: usize, base: &Bounds, shift: bool) -> (f64, f64) {
    if !shift {
        return (0.0, 0.0);
    }
    let n = index as f64;
    (
        n * SHIFT_FRACTION * (base.x_max - base.x_min),
        n * SHIFT_FRACTION * (base.y_max - base.y_min),
    )
}

/// 绘制图表的核心逻辑
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &ChartData,
    options: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    // 未平移时的范围，用于计算平移量
    let mut base = Bounds::empty();
    for d in &data.datasets {
        for (x, y) in d.x().iter().zip(d.y().iter()) {
            base.include(*x, *y);
        }
    }

    let max_dif = data.difference.map(|p| p.max_difference()).unwrap_or(0.0);

    let mut bounds = base;
    for d in &data.datasets {
        let (dx, dy) = dataset_offset(d.index(), &base, options.shift);
        for (x, y) in d.x().iter().zip(d.y().iter()) {
            bounds.include(x + dx, y + dy);
        }
    }
    if let Some(pattern) = data.difference {
        for i in 0..pattern.len() {
            let tt = pattern.two_theta[i];
            bounds.include(tt, pattern.observed[i]);
            bounds.include(tt, pattern.calculated[i]);
            bounds.include(tt, pattern.difference[i] - max_dif);
        }
    }
    for p in data.anchors {
        bounds.include(p.x, p.y);
    }
    for (x, y) in data.background.iter().chain(data.background_plus_difference.iter()) {
        bounds.include(*x, *y);
    }

    if !bounds.is_valid() {
        return Err(LinesError::PlotError("nothing to draw".to_string()));
    }

    // tick marks 画在图样下方
    let tick_span = 0.03 * (bounds.y_max - bounds.y_min).max(1.0);
    let tick_base = if data.difference.is_some() {
        -max_dif / 4.0
    } else {
        bounds.y_min - 2.0 * tick_span
    };
    if let Some(ticks) = data.ticks {
        for x in ticks.x() {
            bounds.include(*x, tick_base - tick_span);
        }
    }

    let bounds = bounds.padded();

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("2θ (°)")
        .y_desc("Intensity")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(plot_err)?;

    // 后创建的数据集先画，第一个数据集在最上层
    for d in data.datasets.iter().rev().filter(|d| !d.is_empty()) {
        let (dx, dy) = dataset_offset(d.index(), &base, options.shift);
        let color = series_color(d.index());
        chart
            .draw_series(LineSeries::new(
                d.x().iter().zip(d.y().iter()).map(|(x, y)| (x + dx, y + dy)),
                color.stroke_width(1),
            ))
            .map_err(plot_err)?
            .label(d.source_name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if let Some(pattern) = data.difference {
        draw_difference(&mut chart, pattern, max_dif)?;
    }

    if let Some(ticks) = data.ticks {
        let purple = RGBColor(128, 0, 128);
        chart
            .draw_series(ticks.x().iter().map(|x| {
                PathElement::new(
                    vec![(*x, tick_base), (*x, tick_base - tick_span)],
                    purple.stroke_width(1),
                )
            }))
            .map_err(plot_err)?
            .label("ticks")
            .legend(move |(x, y)| PathElement::new(vec![(x + 10, y - 5), (x + 10, y + 5)], purple));
    }

    if !data.background_plus_difference.is_empty() {
        let color = RGBColor(255, 140, 0);
        chart
            .draw_series(LineSeries::new(
                data.background_plus_difference.iter().copied(),
                color.stroke_width(1),
            ))
            .map_err(plot_err)?
            .label("bg + diff")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if !data.background.is_empty() {
        let color = RGBColor(0, 102, 204);
        chart
            .draw_series(LineSeries::new(data.background.iter().copied(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label("background")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if !data.anchors.is_empty() {
        chart
            .draw_series(LineSeries::new(
                data.anchors.iter().map(|p| (p.x, p.y)),
                BLACK.mix(0.5).stroke_width(1),
            ))
            .map_err(plot_err)?;
        chart
            .draw_series(
                data.anchors
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), 3, RED.stroke_width(1))),
            )
            .map_err(plot_err)?
            .label("anchors")
            .legend(|(x, y)| Circle::new((x + 10, y), 3, RED.stroke_width(1)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 13))
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

/// 绘制 观测 / 计算 / 差值 曲线，差值下移 max(dif)
fn draw_difference<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    pattern: &DifferencePattern,
    max_dif: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let tt = &pattern.two_theta;
    let series: [(&str, Vec<(f64, f64)>, RGBColor); 3] = [
        (
            "observed",
            tt.iter().copied().zip(pattern.observed.iter().copied()).collect(),
            RGBColor(0, 0, 255),
        ),
        (
            "calculated",
            tt.iter().copied().zip(pattern.calculated.iter().copied()).collect(),
            RGBColor(0, 128, 0),
        ),
        (
            "difference",
            tt.iter()
                .copied()
                .zip(pattern.difference.iter().map(|d| d - max_dif))
                .collect(),
            RGBColor(255, 0, 0),
        ),
    ];

    for (label, points, color) in series {
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(1)))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    // 零线
    if let (Some(first), Some(last)) = (tt.first(), tt.last()) {
        for level in [0.0, -max_dif] {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(*first, level), (*last, level)],
                    BLACK.stroke_width(1),
                )))
                .map_err(plot_err)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_color_cycles() {
        assert_eq!(series_color(0), series_color(7));
        assert_eq!(series_color(6), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_bounds_padding() {
        let mut b = Bounds::empty();
        assert!(!b.is_valid());
        b.include(0.0, 5.0);
        b.include(f64::NAN, 100.0);
        let p = b.padded();
        assert!(p.x_min < 0.0 && p.x_max > 0.0);
        assert!(p.y_min < 5.0 && p.y_max > 5.0);
    }

    #[test]
    fn test_dataset_offset() {
        let base = Bounds {
            x_min: 0.0,
            x_max: 100.0,
            y_min: 0.0,
            y_max: 1000.0,
        };
        assert_eq!(dataset_offset(3, &base, false), (0.0, 0.0));
        assert_eq!(dataset_offset(2, &base, true), (4.0, 40.0));
    }

    #[test]
    fn test_render_nothing_fails() {
        let data = ChartData::default();
        let out = std::env::temp_dir().join("lines-test-empty-chart.svg");
        assert!(matches!(
            render_chart(&data, &out, &ChartOptions::default()),
            Err(LinesError::PlotError(_))
        ));
    }
}
