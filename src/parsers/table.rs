//! # 空白分隔数值表格解析器
//!
//! 读取 xy / xye 数据文件（如 stepscan.dat）和 tick mark 文件（hkl.dat）。
//!
//! ## 格式说明
//! ```text
//! # 注释行
//!   5.000000      1203.00      34.68
//!   5.010000      1198.00      34.61
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/` 使用
//! - 使用 `models/dataset.rs`

use crate::error::{LinesError, Result};
use crate::models::{RawTable, Session, TabularDataset};

use std::fs;
use std::path::Path;

/// 表格读取选项
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// 只保留这些列（从 0 开始，按给定顺序）
    pub usecols: Option<Vec<usize>>,
    /// 追加一列 0
    pub append_zeros: bool,
}

impl TableOptions {
    /// tick mark 文件: 第 4 列为峰位，追加 0 作为 y
    pub fn tick_marks() -> Self {
        TableOptions {
            usecols: Some(vec![3]),
            append_zeros: true,
        }
    }
}

/// 从字符串内容解析表格
pub fn parse_table(content: &str, source_name: &str, options: &TableOptions) -> Result<RawTable> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    LinesError::format(source_name, line_no + 1, format!("not a number: '{}'", token))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let row = match &options.usecols {
            Some(cols) => cols
                .iter()
                .map(|&c| {
                    values.get(c).copied().ok_or_else(|| {
                        LinesError::format(
                            source_name,
                            line_no + 1,
                            format!("column {} requested, only {} present", c + 1, values.len()),
                        )
                    })
                })
                .collect::<Result<Vec<f64>>>()?,
            None => values,
        };

        rows.push(row);
    }

    let mut table = RawTable::new(rows, source_name)?;
    if options.append_zeros {
        table.append_zero_column();
    }
    log::debug!("{}: {} rows, {} columns", source_name, table.len(), table.columns);

    Ok(table)
}

/// 读取数据文件并在会话中创建数据集
pub fn load_dataset(session: &mut Session, path: &Path, options: &TableOptions) -> Result<TabularDataset> {
    let content = fs::read_to_string(path).map_err(|e| LinesError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let source_name = path.display().to_string();
    let table = parse_table(&content, &source_name, options)?;
    Ok(session.dataset(table, source_name))
}

/// 读取 tick mark 文件；文件缺失或格式错误时返回 None 并输出警告
pub fn load_tick_marks(session: &mut Session, path: &Path) -> Option<TabularDataset> {
    match load_dataset(session, path, &TableOptions::tick_marks()) {
        Ok(ticks) => Some(ticks),
        Err(e) => {
            log::warn!("{} skipped: {}", path.display(), e);
            None
        }
    }
}
