//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及它们共用的锚点编辑流程。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `background/`, `parsers/`, `plot/`, `utils/`
//! - 子模块: plot, correct, stepco

pub mod correct;
pub mod plot;
pub mod stepco;

use crate::background::{
    replay, BackgroundEditor, ExportOutcome, InterpolationKind, LatestFrame, PointEditor,
};
use crate::cli::{ChartSizeArgs, Commands};
use crate::error::{LinesError, Result};
use crate::models::BackgroundPointSet;
use crate::parsers::{load_edit_script, parse_crplot_file, DifferencePattern, StepcoDocument};
use crate::plot::{export, ChartOptions};
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Plot(args) => plot::execute(args),
        Commands::Correct(args) => correct::execute(args),
        Commands::Stepco(args) => stepco::execute(args),
    }
}

/// 一次编辑会话的结果
pub(crate) struct EditedAnchors {
    pub anchors: BackgroundPointSet,
    pub frame: LatestFrame,
    pub exports: Vec<ExportOutcome>,
}

/// 建立编辑会话，回放编辑脚本（若有），返回最终锚点和预览曲线
pub(crate) fn edit_anchors(
    anchors: BackgroundPointSet,
    kind: InterpolationKind,
    step: f64,
    edits: Option<&Path>,
    stepco: Option<(StepcoDocument, PathBuf)>,
) -> Result<EditedAnchors> {
    check_step(step)?;

    let mut editor = BackgroundEditor::new(anchors, kind, LatestFrame::default()).with_step(step);
    if let Some((document, target)) = stepco {
        editor = editor.with_stepco(document, target);
    }

    let exports = match edits {
        Some(path) => {
            let commands = load_edit_script(path)?;
            output::print_info(&format!(
                "Replaying {} edits from '{}'",
                commands.len(),
                path.display()
            ));
            replay(&mut editor, &commands)?
        }
        None => Vec::new(),
    };

    log::info!(
        "Session finished with {} anchors ({} interpolation, {} redraws)",
        editor.points().len(),
        editor.kind(),
        editor.redraw_target().redraws
    );
    let (anchors, frame) = editor.finish();

    Ok(EditedAnchors {
        anchors,
        frame,
        exports,
    })
}

/// 报告导出结果
pub(crate) fn report_exports(exports: &[ExportOutcome]) {
    for outcome in exports {
        match outcome {
            ExportOutcome::Stepco {
                target,
                backup,
                points,
            } => {
                if let Some(backup) = backup {
                    output::print_written("backup", backup);
                }
                output::print_written(&format!("{} BGVALU points", points), target);
            }
            ExportOutcome::Listing(lines) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            ExportOutcome::Empty => output::print_warning("No stored coordinates."),
        }
    }
}

/// 按需将锚点保存为 CSV
pub(crate) fn save_anchors(anchors: &BackgroundPointSet, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        export::anchors_to_csv(anchors, path)?;
        output::print_written("anchors", path);
    }
    Ok(())
}

/// 读取差值文件；失败时只给出警告
pub(crate) fn load_difference(path: &Path) -> Option<DifferencePattern> {
    match parse_crplot_file(path) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            output::print_warning(&format!("Difference curve skipped: {}", e));
            None
        }
    }
}

/// 背景 + 差值；锚点不足时为空
pub(crate) fn background_plus_difference(
    pattern: Option<&DifferencePattern>,
    anchors: &BackgroundPointSet,
) -> Vec<(f64, f64)> {
    pattern
        .and_then(|p| p.background_plus_difference(anchors).ok())
        .unwrap_or_default()
}

fn check_step(step: f64) -> Result<()> {
    if step > 0.0 && step.is_finite() {
        Ok(())
    } else {
        Err(LinesError::InvalidArgument(format!(
            "sampling step must be positive, got {}",
            step
        )))
    }
}

/// 图表选项；尺寸为 0 时报错
pub(crate) fn chart_options(size: ChartSizeArgs, title: &str, shift: bool) -> Result<ChartOptions> {
    if size.width == 0 || size.height == 0 {
        return Err(LinesError::InvalidArgument(format!(
            "chart size must be positive, got {}x{}",
            size.width, size.height
        )));
    }

    Ok(ChartOptions {
        title: title.to_string(),
        width: size.width,
        height: size.height,
        shift,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use std::fs;

    #[test]
    fn test_edit_anchors_replays_script() {
        let dir = std::env::temp_dir().join(format!("lines-commands-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let script = dir.join("edits.txt");
        fs::write(&script, "# seed\nadd 1 1\nadd 3 3\nadd 2 5\nexport\nremove 2\n").unwrap();

        let edited = edit_anchors(
            BackgroundPointSet::new(),
            InterpolationKind::Linear,
            0.5,
            Some(script.as_path()),
            None,
        )
        .unwrap();

        assert_eq!(edited.anchors.points(), &[Point::new(1.0, 1.0), Point::new(2.0, 5.0)]);
        assert_eq!(edited.exports.len(), 1);
        assert_eq!(edited.frame.curve.len(), 3);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_step_and_size() {
        let result = edit_anchors(BackgroundPointSet::new(), InterpolationKind::Linear, 0.0, None, None);
        assert!(matches!(result, Err(LinesError::InvalidArgument(_))));

        let size = ChartSizeArgs { width: 0, height: 10 };
        assert!(chart_options(size, "t", false).is_err());
        let size = ChartSizeArgs { width: 640, height: 480 };
        assert_eq!(chart_options(size, "t", true).unwrap().width, 640);
    }

    #[test]
    fn test_background_plus_difference_without_anchors() {
        let pattern = DifferencePattern {
            two_theta: vec![1.0, 2.0],
            observed: vec![10.0, 11.0],
            calculated: vec![9.0, 10.0],
            difference: vec![1.0, 1.0],
        };
        assert!(background_plus_difference(Some(&pattern), &BackgroundPointSet::new()).is_empty());
        assert!(background_plus_difference(None, &BackgroundPointSet::new()).is_empty());
    }

    #[test]
    fn test_load_difference_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!("lines-crplot-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        assert!(load_difference(&dir.join("missing.crplot")).is_none());

        let malformed = dir.join("malformed.crplot");
        fs::write(&malformed, "header 1\nheader 2\n10.0 100.0 95.0\n").unwrap();
        assert!(load_difference(&malformed).is_none());

        let good = dir.join("good.crplot");
        fs::write(&good, "header 1\nheader 2\n10.0 100.0 95.0 5.0\n10.5 110.0 104.0 6.0\n").unwrap();
        let pattern = load_difference(&good).unwrap();
        assert_eq!(pattern.two_theta, vec![10.0, 10.5]);
        assert_eq!(pattern.difference, vec![5.0, 6.0]);

        fs::remove_dir_all(&dir).ok();
    }
}
