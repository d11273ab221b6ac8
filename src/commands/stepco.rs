//! # stepco 命令实现
//!
//! 编辑 stepco 文件中的 BGVALU 背景点并写回。
//!
//! ## 流程
//! 1. 读取 stepco 文件；步进扫描数据只用于绘图，读取失败时给出警告
//! 2. 回放编辑脚本，`export` 时备份来源文件并写出
//! 3. 可选: 差值文件（线性背景 + 差值）、锚点 CSV、图片
//!
//! ## 依赖关系
//! - 使用 `cli/stepco.rs` 定义的参数
//! - 使用 `parsers/stepco.rs`, `background/editor.rs`, `plot/`

use super::{
    background_plus_difference, chart_options, edit_anchors, load_difference, report_exports,
    save_anchors,
};
use crate::cli::stepco::StepcoArgs;
use crate::error::Result;
use crate::models::Session;
use crate::parsers::{load_dataset, StepcoDocument, TableOptions};
use crate::plot::{render_chart, ChartData};
use crate::utils::output;

/// 执行 stepco 命令
pub fn execute(args: StepcoArgs) -> Result<()> {
    output::print_header("Stepco Background Editor");

    let document = StepcoDocument::from_file(&args.xrs)?;
    output::print_info(&format!(
        "'{}': {} BGVALU points",
        args.xrs.display(),
        document.points().len()
    ));

    let mut session = Session::new();
    let scan = match load_dataset(&mut session, &args.data, &TableOptions::default()) {
        Ok(scan) => Some(scan),
        Err(e) => {
            output::print_warning(&format!("Step scan skipped: {}", e));
            None
        }
    };

    let target = args.output.clone().unwrap_or_else(|| args.xrs.clone());
    let anchors = document.point_set();
    let bg = &args.background;
    let edited = edit_anchors(
        anchors,
        bg.kind,
        bg.step,
        bg.edits.as_deref(),
        Some((document, target.clone())),
    )?;

    if edited.exports.is_empty() {
        output::print_info(&format!("No export requested, '{}' left unchanged", target.display()));
    }
    report_exports(&edited.exports);
    output::print_anchor_table(edited.anchors.points());
    save_anchors(&edited.anchors, bg.save_anchors.as_deref())?;

    if let Some(plot_path) = &args.plot {
        let difference = args.crplot.as_deref().and_then(load_difference);
        let bg_dif = background_plus_difference(difference.as_ref(), &edited.anchors);

        let data = ChartData {
            datasets: scan.iter().collect(),
            ticks: None,
            difference: difference.as_ref(),
            anchors: &edited.frame.anchors,
            background: &edited.frame.curve,
            background_plus_difference: &bg_dif,
        };
        render_chart(&data, plot_path, &chart_options(args.size, "stepco", false)?)?;
        output::print_written("chart", plot_path);
    }

    Ok(())
}
