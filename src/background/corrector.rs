//! # 背景扣除
//!
//! 在数据集自身的 x 位置上插值背景，输出背景曲线和扣除后的图样。
//!
//! ## 规则
//! - 至少需要 4 个锚点
//! - 背景为 NaN（锚点范围外）的位置在两份输出中都被跳过
//! - 扣除结果 = y - background + offset
//! - 输出文件名: `<stem>_bg.<ext>`, `<stem>_corr.<ext>`，已存在时直接覆盖
//!
//! ## 依赖关系
//! - 被 `commands/correct.rs` 调用
//! - 使用 `models/` 和 `plot/export.rs`

use crate::background::interpolate::InterpolationKind;
use crate::error::{LinesError, Result};
use crate::models::{BackgroundPointSet, TabularDataset};
use crate::plot::export;

use std::path::{Path, PathBuf};

/// 背景扣除所需的最少锚点数
pub const MIN_ANCHORS: usize = 4;

/// 背景扣除结果
#[derive(Debug, Clone, Default)]
pub struct Correction {
    /// 插值得到的背景 (x, bg)
    pub background: Vec<(f64, f64)>,
    /// 扣除背景后的图样 (x, y - bg + offset)
    pub corrected: Vec<(f64, f64)>,
}

/// 输出文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionPaths {
    pub background: PathBuf,
    pub corrected: PathBuf,
}

impl CorrectionPaths {
    /// 在扩展名之前插入 `_bg` / `_corr`
    pub fn for_source(source: &Path) -> Self {
        CorrectionPaths {
            background: with_suffix(source, "_bg"),
            corrected: with_suffix(source, "_corr"),
        }
    }
}

fn with_suffix(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    };

    source.with_file_name(name)
}

/// 背景扣除器
#[derive(Debug, Clone, Copy)]
pub struct BackgroundCorrector {
    pub kind: InterpolationKind,
    /// 加到每个扣除后数据点上的常数
    pub offset: i64,
}

impl BackgroundCorrector {
    pub fn new(kind: InterpolationKind, offset: i64) -> Self {
        BackgroundCorrector { kind, offset }
    }

    /// 计算背景和扣除后的图样
    pub fn correct(&self, dataset: &TabularDataset, anchors: &BackgroundPointSet) -> Result<Correction> {
        if anchors.len() < MIN_ANCHORS {
            return Err(LinesError::InsufficientAnchors {
                required: MIN_ANCHORS,
                found: anchors.len(),
            });
        }

        let background = anchors.evaluate(dataset.x(), self.kind)?;
        let offset = self.offset as f64;

        let mut correction = Correction::default();
        for ((&x, &y), &bg) in dataset.x().iter().zip(dataset.y().iter()).zip(background.iter()) {
            if bg.is_nan() {
                continue;
            }
            correction.background.push((x, bg));
            correction.corrected.push((x, y - bg + offset));
        }

        log::info!(
            "Background correction of {}: {} of {} points inside the anchor range",
            dataset.source_name(),
            correction.background.len(),
            dataset.len()
        );

        Ok(correction)
    }

    /// 写出背景和扣除结果
    ///
    /// 两个文件依次写出，不保证原子性：第二个文件写入失败时第一个文件已经存在。
    pub fn write(&self, correction: &Correction, source: &Path) -> Result<CorrectionPaths> {
        let paths = CorrectionPaths::for_source(source);
        export::write_xy_columns(&correction.background, &paths.background)?;
        export::write_xy_columns(&correction.corrected, &paths.corrected)?;
        Ok(paths)
    }
}
