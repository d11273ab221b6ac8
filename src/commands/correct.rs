//! # correct 命令实现
//!
//! 在图样上选取背景锚点并扣除背景。
//!
//! ## 流程
//! 1. 读取图样；锚点来自 CSV 文件，否则为图样首尾两点
//! 2. 回放编辑脚本
//! 3. 在图样自身的 x 上插值背景，写出 `_bg` / `_corr` 文件
//! 4. 可选: 保存锚点 CSV、生成图片
//!
//! ## 依赖关系
//! - 使用 `cli/correct.rs` 定义的参数
//! - 使用 `background/corrector.rs`, `parsers/table.rs`, `plot/`

use super::{chart_options, edit_anchors, report_exports, save_anchors};
use crate::background::BackgroundCorrector;
use crate::cli::correct::CorrectArgs;
use crate::error::Result;
use crate::models::{BackgroundPointSet, Session};
use crate::parsers::{load_dataset, TableOptions};
use crate::plot::{export, render_chart, ChartData};
use crate::utils::output;

/// 执行 correct 命令
pub fn execute(args: CorrectArgs) -> Result<()> {
    output::print_header("Background Correction");

    let mut session = Session::new();
    let dataset = load_dataset(&mut session, &args.file, &TableOptions::default())?;
    output::print_info(&format!("{}: {} points", dataset.source_name(), dataset.len()));

    let seed = match &args.anchors {
        Some(path) => export::anchors_from_csv(path)?,
        None => BackgroundPointSet::from_endpoints(&dataset),
    };
    output::print_info(&format!("Starting from {} anchors", seed.len()));

    let bg = &args.background;
    let edited = edit_anchors(seed, bg.kind, bg.step, bg.edits.as_deref(), None)?;
    report_exports(&edited.exports);
    save_anchors(&edited.anchors, bg.save_anchors.as_deref())?;

    if let Some(plot_path) = &args.plot {
        let data = ChartData {
            datasets: vec![&dataset],
            anchors: &edited.frame.anchors,
            background: &edited.frame.curve,
            ..Default::default()
        };
        render_chart(&data, plot_path, &chart_options(args.size, "background", false)?)?;
        output::print_written("chart", plot_path);
    }

    let corrector = BackgroundCorrector::new(bg.kind, args.offset);
    let correction = corrector.correct(&dataset, &edited.anchors)?;
    let paths = corrector.write(&correction, &args.file)?;

    output::print_written("background", &paths.background);
    output::print_written("corrected", &paths.corrected);
    output::print_done(&format!(
        "Subtracted {} background at {} points",
        bg.kind,
        correction.corrected.len()
    ));

    Ok(())
}
