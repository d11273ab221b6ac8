//! # plot 命令实现
//!
//! 绘制一个或多个衍射图样。
//!
//! ## 功能
//! - 每个数据文件一条曲线，按创建序号着色，可选平移
//! - 可选 tick marks、观测 / 计算 / 差值曲线
//! - 可选 stepco 文件中的 BGVALU 点及其插值背景
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `parsers/`, `plot/`, `utils/output.rs`

use super::{background_plus_difference, chart_options, edit_anchors, load_difference};
use crate::cli::plot::PlotArgs;
use crate::error::Result;
use crate::models::{BackgroundPointSet, Session};
use crate::parsers::{load_dataset, load_tick_marks, StepcoDocument, TableOptions};
use crate::plot::{render_chart, ChartData};
use crate::utils::output;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    output::print_header("Plotting Powder Patterns");

    let options = chart_options(args.size, "lines", args.shift)?;
    let mut session = Session::new();

    let datasets = args
        .files
        .iter()
        .map(|path| load_dataset(&mut session, path, &TableOptions::default()))
        .collect::<Result<Vec<_>>>()?;

    for d in &datasets {
        output::print_info(&format!(
            "{}: {} points{}",
            d.source_name(),
            d.len(),
            if d.has_esd() { " with esd" } else { "" }
        ));
    }

    let ticks = args
        .ticks
        .as_deref()
        .and_then(|path| load_tick_marks(&mut session, path));
    let difference = args.crplot.as_deref().and_then(load_difference);
    log::info!("{} datasets loaded", session.created());

    let anchors = match &args.xrs {
        Some(path) => StepcoDocument::from_file(path)?.point_set(),
        None => BackgroundPointSet::new(),
    };
    let edited = edit_anchors(anchors, args.kind, args.step, None, None)?;
    let bg_dif = background_plus_difference(difference.as_ref(), &edited.anchors);

    let data = ChartData {
        datasets: datasets.iter().collect(),
        ticks: ticks.as_ref(),
        difference: difference.as_ref(),
        anchors: &edited.frame.anchors,
        background: &edited.frame.curve,
        background_plus_difference: &bg_dif,
    };

    render_chart(&data, &args.output, &options)?;
    output::print_written("chart", &args.output);

    Ok(())
}
