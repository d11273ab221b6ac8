//! # stepco / xrs 指令文件解析器
//!
//! 解析 stepco.inp 这类仪器程序文件，提取 BGVALU 背景点，并在改写时
//! 原样保留数据块以外的所有文本。
//!
//! ## 格式说明
//! ```text
//! TITLE  sample 1
//! ...                       <- preamble (原样保留)
//! BGVALU      5.000000     1203.00
//! BGVALU     10.000000      980.50        12.30
//! ...                       <- 数据块
//! FINISH                    <- 终止行 (包含 "finish" 或 "end")
//! ...                       <- postamble (原样保留)
//! ```
//!
//! ## 解析规则
//! - 含有 `finish` / `end`（不区分大小写）的行进入 postamble，之后所有行都属于 postamble
//! - 首个词为 `BGVALU` 的行解析为数据点 (x, y, [esd])
//! - 尚未遇到数据点时，其他行属于 preamble；遇到数据点后属于 postamble
//!
//! ## 依赖关系
//! - 被 `commands/stepco.rs`, `background/editor.rs` 使用
//! - 使用 `models/` 和 `background/interpolate.rs`

use crate::background::interpolate::{InterpolationKind, Interpolator};
use crate::error::{LinesError, Result};
use crate::models::{BackgroundPointSet, Point};

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// 背景点指令关键字
pub const DIRECTIVE: &str = "BGVALU";

fn terminator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)finish|end").expect("terminator pattern is valid"))
}

/// 是否为数据块终止行
pub fn is_terminator(line: &str) -> bool {
    terminator_pattern().is_match(line)
}

/// 是否为 BGVALU 指令行
pub fn is_directive(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map(|token| token.eq_ignore_ascii_case(DIRECTIVE))
        .unwrap_or(false)
}

/// 按固定列宽格式化一行 BGVALU 指令
pub fn format_directive(x: f64, y: f64, esd: f64) -> String {
    let esd = if esd.is_nan() {
        String::new()
    } else {
        format!("{:15.2}", esd)
    };
    format!("{}    {:15.6}{:15.2}{}\n", DIRECTIVE, x, y, esd)
}

/// BGVALU 数据点
#[derive(Debug, Clone, PartialEq)]
pub struct StepcoPoint {
    pub x: f64,
    pub y: f64,
    /// 缺失时为 NaN
    pub esd: f64,
    /// 原始行文本（未修改的点原样写回）
    raw: Option<String>,
}

impl StepcoPoint {
    pub fn new(x: f64, y: f64, esd: f64) -> Self {
        StepcoPoint { x, y, esd, raw: None }
    }

    /// 输出用的指令行
    pub fn to_line(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => format_directive(self.x, self.y, self.esd),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Pre,
    InData,
    Post,
}

/// stepco 文件文档
#[derive(Debug, Clone)]
pub struct StepcoDocument {
    /// 来源文件路径
    pub origin_path: PathBuf,
    /// 数据块之前的原始行（含换行符）
    pub preamble: Vec<String>,
    /// 终止行及其后的原始行（含换行符）
    pub postamble: Vec<String>,
    points: Vec<StepcoPoint>,
    /// 解析时带有 esd 的 (x, esd)，按 x 排序，用于为新点插值 esd
    esd_reference: Vec<Point>,
    /// 本次会话是否已经处理过备份
    backed_up: bool,
}

impl StepcoDocument {
    /// 读取并解析 stepco 文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| LinesError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        StepcoDocument::parse(&content, path)
    }

    /// 从字符串内容解析
    pub fn parse(content: &str, origin_path: impl Into<PathBuf>) -> Result<Self> {
        let origin_path = origin_path.into();
        let source_name = origin_path.display().to_string();

        let mut state = ParseState::Pre;
        let mut preamble = Vec::new();
        let mut postamble = Vec::new();
        let mut points = Vec::new();

        for (line_no, line) in content.split_inclusive('\n').enumerate() {
            if is_terminator(line) {
                state = ParseState::Post;
                postamble.push(line.to_string());
                continue;
            }

            match state {
                ParseState::Post => postamble.push(line.to_string()),
                _ if is_directive(line) => {
                    points.push(parse_directive(line, &source_name, line_no + 1)?);
                    state = ParseState::InData;
                }
                ParseState::Pre => preamble.push(line.to_string()),
                // 数据点之后、终止行之前的其他行
                ParseState::InData => postamble.push(line.to_string()),
            }
        }

        let esd_reference = BackgroundPointSet::from_points(
            points
                .iter()
                .filter(|p: &&StepcoPoint| p.esd.is_finite())
                .map(|p| Point::new(p.x, p.esd)),
        )
        .points()
        .to_vec();

        log::info!(
            "Parsed {}: {} preamble lines, {} BGVALU points, {} postamble lines",
            source_name,
            preamble.len(),
            points.len(),
            postamble.len()
        );

        Ok(StepcoDocument {
            origin_path,
            preamble,
            postamble,
            points,
            esd_reference,
            backed_up: false,
        })
    }

    /// 当前数据点
    pub fn points(&self) -> &[StepcoPoint] {
        &self.points
    }

    /// 数据点转换为背景锚点集合
    pub fn point_set(&self) -> BackgroundPointSet {
        BackgroundPointSet::from_points(self.points.iter().map(|p| Point::new(p.x, p.y)))
    }

    /// 用新的锚点替换数据点
    ///
    /// 与原有点完全相同的点沿用原始行文本和 esd；新点的 esd 由原有 esd 线性插值，
    /// 原文件没有 esd 或超出范围时留空。
    pub fn set_points(&mut self, anchors: &BackgroundPointSet) {
        let esd_interpolator = Interpolator::new(&self.esd_reference, InterpolationKind::Linear).ok();
        if esd_interpolator.is_some() {
            log::info!("Interpolating standard deviations for new BGVALU points");
        }

        let mut previous: Vec<Option<StepcoPoint>> = self.points.drain(..).map(Some).collect();

        self.points = anchors
            .points()
            .iter()
            .map(|anchor| {
                let reused = previous
                    .iter_mut()
                    .find(|slot| {
                        slot.as_ref()
                            .map(|p| p.x == anchor.x && p.y == anchor.y)
                            .unwrap_or(false)
                    })
                    .and_then(Option::take);

                reused.unwrap_or_else(|| {
                    let esd = esd_interpolator
                        .as_ref()
                        .map(|i| i.eval(anchor.x))
                        .unwrap_or(f64::NAN);
                    StepcoPoint::new(anchor.x, anchor.y, esd)
                })
            })
            .collect();
    }

    /// 序列化为文件内容: preamble + BGVALU 行 + postamble
    pub fn to_stepco_string(&self) -> String {
        let mut result = String::new();
        for line in &self.preamble {
            result.push_str(line);
        }
        for point in &self.points {
            result.push_str(&point.to_line());
        }
        for line in &self.postamble {
            result.push_str(line);
        }
        result
    }

    /// 备份文件路径: `<origin>~`
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.origin_path.clone().into_os_string();
        name.push("~");
        PathBuf::from(name)
    }

    /// 写出到 target；本次会话第一次保存前先将来源文件备份为 `<origin>~`
    ///
    /// 返回本次调用创建的备份文件路径。之后的保存不再覆盖备份，返回 None；
    /// 来源文件不存在时也为 None。
    pub fn save(&mut self, target: &Path) -> Result<Option<PathBuf>> {
        let backup = if !self.backed_up && self.origin_path.is_file() {
            let backup = self.backup_path();
            fs::copy(&self.origin_path, &backup).map_err(|e| LinesError::FileWriteError {
                path: backup.display().to_string(),
                source: e,
            })?;
            log::info!("Backed up {} to {}", self.origin_path.display(), backup.display());
            Some(backup)
        } else {
            None
        };
        self.backed_up = true;

        fs::write(target, self.to_stepco_string()).map_err(|e| LinesError::FileWriteError {
            path: target.display().to_string(),
            source: e,
        })?;

        Ok(backup)
    }
}

/// 解析单行 BGVALU 指令
fn parse_directive(line: &str, source_name: &str, line_no: usize) -> Result<StepcoPoint> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(LinesError::format(
            source_name,
            line_no,
            format!("{} line needs x and y values", DIRECTIVE),
        ));
    }

    let number = |token: &str| {
        token.parse::<f64>().map_err(|_| {
            LinesError::format(source_name, line_no, format!("not a number: '{}'", token))
        })
    };

    let x = number(parts[1])?;
    let y = number(parts[2])?;
    let esd = match parts.get(3) {
        Some(token) => number(token)?,
        None => f64::NAN,
    };

    Ok(StepcoPoint {
        x,
        y,
        esd,
        raw: Some(line.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "TITLE  quartz  stepco\n\
WAVELENGTH 1.54056\n\
bgvalu   5.0   1203.0   34.7\n\
BGVALU      10.000000        980.50\n\
BGVALU   20.0   870.25   29.5\n\
FINISH\n\
! trailing comment\n";

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lines-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_sections() {
        let doc = StepcoDocument::parse(SAMPLE, "stepco.inp").unwrap();
        assert_eq!(doc.preamble.len(), 2);
        assert_eq!(doc.points().len(), 3);
        assert_eq!(doc.postamble, vec!["FINISH\n", "! trailing comment\n"]);

        assert_eq!(doc.points()[0].x, 5.0);
        assert_eq!(doc.points()[0].esd, 34.7);
        assert!(doc.points()[1].esd.is_nan());
        assert_eq!(doc.points()[2].y, 870.25);
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let doc = StepcoDocument::parse(SAMPLE, "stepco.inp").unwrap();
        assert_eq!(doc.to_stepco_string(), SAMPLE);
    }

    #[test]
    fn test_round_trip_after_unchanged_edit() {
        let mut doc = StepcoDocument::parse(SAMPLE, "stepco.inp").unwrap();
        let set = doc.point_set();
        doc.set_points(&set);
        assert_eq!(doc.to_stepco_string(), SAMPLE);
    }

    #[test]
    fn test_round_trip_crlf_and_no_final_newline() {
        let content = "TITLE x\r\nBGVALU 1 2\r\nEND";
        let doc = StepcoDocument::parse(content, "x.inp").unwrap();
        assert_eq!(doc.points().len(), 1);
        assert_eq!(doc.to_stepco_string(), content);
    }

    #[test]
    fn test_remove_only_point() {
        let content = "Title foo\nBGVALU    1.000000       2.00\nFinish\n";
        let mut doc = StepcoDocument::parse(content, "stepco.inp").unwrap();
        assert_eq!(doc.preamble, vec!["Title foo\n"]);
        assert_eq!(doc.postamble, vec!["Finish\n"]);

        let mut set = doc.point_set();
        set.remove_points(&[0]);
        doc.set_points(&set);
        assert_eq!(doc.to_stepco_string(), "Title foo\nFinish\n");
    }

    #[test]
    fn test_comment_after_data_goes_to_postamble() {
        let content = "TITLE t\nBGVALU 1 2\nBGVALU 3 4\n! comment after data\n";
        let doc = StepcoDocument::parse(content, "stepco.inp").unwrap();
        assert_eq!(doc.preamble, vec!["TITLE t\n"]);
        assert_eq!(doc.points().len(), 2);
        assert_eq!(doc.postamble, vec!["! comment after data\n"]);
    }

    #[test]
    fn test_directive_after_terminator_is_postamble() {
        let content = "BGVALU 1 2\nFINISH\nBGVALU 3 4\n";
        let doc = StepcoDocument::parse(content, "stepco.inp").unwrap();
        assert_eq!(doc.points().len(), 1);
        assert_eq!(doc.postamble, vec!["FINISH\n", "BGVALU 3 4\n"]);
    }

    #[test]
    fn test_terminator_wins_over_directive() {
        let content = "BGVALU 1 2\nBGVALU 3 4 ! end of block\n";
        let doc = StepcoDocument::parse(content, "stepco.inp").unwrap();
        assert_eq!(doc.points().len(), 1);
        assert_eq!(doc.postamble, vec!["BGVALU 3 4 ! end of block\n"]);
    }

    #[test]
    fn test_no_data_block() {
        let content = "TITLE new file\nWAVELENGTH 1.54\nFINISH\n";
        let doc = StepcoDocument::parse(content, "stepco.inp").unwrap();
        assert!(doc.points().is_empty());
        assert_eq!(doc.preamble.len(), 2);
        assert_eq!(doc.to_stepco_string(), content);
    }

    #[test]
    fn test_directive_missing_values() {
        let result = StepcoDocument::parse("TITLE\nBGVALU 5.0\n", "stepco.inp");
        assert!(matches!(result, Err(LinesError::FormatError { line: 2, .. })));

        let result = StepcoDocument::parse("BGVALU 5.0 abc\n", "stepco.inp");
        assert!(result.is_err());
    }

    #[test]
    fn test_format_directive_fixed_width() {
        let line = format_directive(1.0, 2.0, f64::NAN);
        assert_eq!(line, "BGVALU           1.000000           2.00\n");

        let wide = format_directive(12345.678, 98765.4321, 3.456);
        assert_eq!(wide, "BGVALU       12345.678000       98765.43           3.46\n");
        assert_eq!(line.len() + 15, wide.len());
    }

    #[test]
    fn test_new_points_get_interpolated_esd() {
        let content = "BGVALU 10 100 2.0\nBGVALU 20 200 4.0\nFINISH\n";
        let mut doc = StepcoDocument::parse(content, "stepco.inp").unwrap();

        let mut set = doc.point_set();
        set.add_point(15.0, 150.0);
        set.add_point(30.0, 300.0);
        doc.set_points(&set);

        let esds: Vec<f64> = doc.points().iter().map(|p| p.esd).collect();
        assert_eq!(esds[0], 2.0);
        assert_eq!(esds[1], 3.0);
        assert_eq!(esds[2], 4.0);
        assert!(esds[3].is_nan());

        let text = doc.to_stepco_string();
        assert!(text.contains("BGVALU          15.000000         150.00           3.00\n"));
        assert!(text.contains("BGVALU          30.000000         300.00\n"));
        assert!(text.starts_with("BGVALU 10 100 2.0\n"));
    }

    #[test]
    fn test_esd_interpolation_ignores_source_order() {
        let content = "BGVALU 30 300 6.0\nBGVALU 10 100 2.0\nBGVALU 20 200 4.0\nFINISH\n";
        let mut doc = StepcoDocument::parse(content, "stepco.inp").unwrap();

        let mut set = doc.point_set();
        set.add_point(15.0, 150.0);
        set.add_point(25.0, 250.0);
        doc.set_points(&set);

        let added: Vec<f64> = doc
            .points()
            .iter()
            .filter(|p| p.x == 15.0 || p.x == 25.0)
            .map(|p| p.esd)
            .collect();
        assert_eq!(added, vec![3.0, 5.0]);
    }

    #[test]
    fn test_save_writes_backup_first() {
        let dir = temp_dir("save");
        let origin = dir.join("stepco.inp");
        fs::write(&origin, SAMPLE).unwrap();

        let mut doc = StepcoDocument::from_file(&origin).unwrap();
        let mut set = doc.point_set();
        set.remove_points(&[1]);
        doc.set_points(&set);

        let backup = doc.save(&origin).unwrap().unwrap();
        assert_eq!(backup, dir.join("stepco.inp~"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), SAMPLE);

        let rewritten = StepcoDocument::from_file(&origin).unwrap();
        assert_eq!(rewritten.points().len(), 2);
        assert_eq!(rewritten.preamble, doc.preamble);
        assert_eq!(rewritten.postamble, doc.postamble);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_second_save_keeps_first_backup() {
        let dir = temp_dir("save-twice");
        let origin = dir.join("stepco.inp");
        fs::write(&origin, SAMPLE).unwrap();

        let mut doc = StepcoDocument::from_file(&origin).unwrap();
        let mut set = doc.point_set();
        set.remove_points(&[0]);
        doc.set_points(&set);
        assert_eq!(doc.save(&origin).unwrap(), Some(dir.join("stepco.inp~")));

        set.remove_points(&[0]);
        doc.set_points(&set);
        assert_eq!(doc.save(&origin).unwrap(), None);

        assert_eq!(fs::read_to_string(dir.join("stepco.inp~")).unwrap(), SAMPLE);
        assert_eq!(StepcoDocument::from_file(&origin).unwrap().points().len(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
