//! # 表格数据集模型
//!
//! x / y / (esd) 三列数据，从空白分隔的文本表格构造。
//!
//! ## 列规则
//! - 1 列: 纯 y 数据，x 为 0, 1, 2, ...
//! - 2 列: x, y
//! - 3 列: x, y, esd
//! - 超过 3 列: 截断为前 3 列，并输出警告
//!
//! ## 依赖关系
//! - 被 `parsers/table.rs`, `background/`, `commands/` 使用
//! - `Session` 负责分配数据集序号（替代全局计数器）

use crate::error::{LinesError, Result};

/// 保留的最大语义列数 (x, y, esd)
pub const MAX_COLUMNS: usize = 3;

/// 经过校验的原始数值表格（矩形，列数一致）
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// 列数
    pub columns: usize,
    /// 行数据
    pub rows: Vec<Vec<f64>>,
}

impl RawTable {
    /// 从行数据构造并检查矩形性
    pub fn new(rows: Vec<Vec<f64>>, source_name: &str) -> Result<Self> {
        let columns = match rows.first() {
            Some(first) => first.len(),
            None => return Err(LinesError::format(source_name, 0, "no numeric rows found")),
        };

        if columns == 0 {
            return Err(LinesError::format(source_name, 1, "row without columns"));
        }

        if let Some(pos) = rows.iter().position(|r| r.len() != columns) {
            return Err(LinesError::format(
                source_name,
                pos + 1,
                format!(
                    "table is not rectangular: expected {} columns, found {}",
                    columns,
                    rows[pos].len()
                ),
            ));
        }

        Ok(RawTable { columns, rows })
    }

    /// 在每行末尾追加一列 0（用于 tick mark 文件）
    pub fn append_zero_column(&mut self) {
        for row in &mut self.rows {
            row.push(0.0);
        }
        self.columns += 1;
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// x / y / esd 数据集，构造后只读
#[derive(Debug, Clone)]
pub struct TabularDataset {
    index: usize,
    source_name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    esd: Option<Vec<f64>>,
}

impl TabularDataset {
    /// 创建序号（由 Session 分配，用于绘图时的颜色和偏移）
    pub fn index(&self) -> usize {
        self.index
    }

    /// 来源标签（通常是文件路径）
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// 标准偏差列；缺失或全为 NaN 时为 None
    pub fn esd(&self) -> Option<&[f64]> {
        self.esd.as_deref()
    }

    /// 数据点数量
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// 是否带有 esd 列
    pub fn has_esd(&self) -> bool {
        self.esd().is_some()
    }

    /// 第一个和最后一个数据点
    pub fn endpoints(&self) -> Option<((f64, f64), (f64, f64))> {
        match (self.x.first(), self.y.first(), self.x.last(), self.y.last()) {
            (Some(&x1), Some(&y1), Some(&x2), Some(&y2)) => Some(((x1, y1), (x2, y2))),
            _ => None,
        }
    }
}

/// 编辑会话上下文
///
/// 持有数据集创建计数器。每个会话从 0 开始计数，不存在跨会话共享状态。
#[derive(Debug, Default)]
pub struct Session {
    next_index: usize,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// 本会话已创建的数据集数量
    pub fn created(&self) -> usize {
        self.next_index
    }

    fn take_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// 从已校验的表格创建数据集
    pub fn dataset(&mut self, table: RawTable, source_name: impl Into<String>) -> TabularDataset {
        let source_name = source_name.into();
        let mut columns = table.columns;

        if columns > MAX_COLUMNS {
            log::warn!(
                "More than {} columns read from {}, assuming x,y,esd, ignoring the rest.",
                MAX_COLUMNS,
                source_name
            );
            columns = MAX_COLUMNS;
        }

        let n = table.rows.len();
        let (x, y, esd) = match columns {
            1 => (
                (0..n).map(|i| i as f64).collect(),
                table.rows.iter().map(|r| r[0]).collect(),
                None,
            ),
            2 => (
                table.rows.iter().map(|r| r[0]).collect(),
                table.rows.iter().map(|r| r[1]).collect(),
                None,
            ),
            _ => (
                table.rows.iter().map(|r| r[0]).collect(),
                table.rows.iter().map(|r| r[1]).collect(),
                Some(table.rows.iter().map(|r| r[2]).collect::<Vec<f64>>()),
            ),
        };

        self.dataset_from_columns(x, y, esd, source_name)
    }

    /// 从列数据创建数据集（例如 stepco 文件中的 BGVALU 点）
    pub fn dataset_from_columns(
        &mut self,
        x: Vec<f64>,
        y: Vec<f64>,
        esd: Option<Vec<f64>>,
        source_name: impl Into<String>,
    ) -> TabularDataset {
        let esd = esd.filter(|e| e.iter().any(|v| !v.is_nan()));
        let dataset = TabularDataset {
            index: self.take_index(),
            source_name: source_name.into(),
            x,
            y,
            esd,
        };

        log::info!(
            "Loaded data: {} ({} rows, esd: {})",
            dataset.source_name,
            dataset.len(),
            dataset.has_esd()
        );

        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<f64>>) -> RawTable {
        RawTable::new(rows, "test").unwrap()
    }

    #[test]
    fn test_non_rectangular_table() {
        let result = RawTable::new(vec![vec![1.0, 2.0], vec![3.0]], "test");
        assert!(matches!(result, Err(LinesError::FormatError { line: 2, .. })));
    }

    #[test]
    fn test_empty_table() {
        assert!(RawTable::new(vec![], "test").is_err());
    }

    #[test]
    fn test_single_column_is_pure_y() {
        let mut session = Session::new();
        let d = session.dataset(table(vec![vec![5.0], vec![6.0], vec![7.0]]), "y.dat");
        assert_eq!(d.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(d.y(), &[5.0, 6.0, 7.0]);
        assert!(!d.has_esd());
    }

    #[test]
    fn test_extra_columns_truncated() {
        let mut session = Session::new();
        let d = session.dataset(table(vec![vec![1.0, 2.0, 0.5, 9.0, 9.0]]), "wide.dat");
        assert_eq!(d.x(), &[1.0]);
        assert_eq!(d.y(), &[2.0]);
        assert_eq!(d.esd(), Some(&[0.5][..]));
    }

    #[test]
    fn test_nan_esd_treated_as_absent() {
        let mut session = Session::new();
        let d = session.dataset_from_columns(vec![1.0], vec![2.0], Some(vec![f64::NAN]), "stepco.inp");
        assert!(!d.has_esd());
        assert_eq!(d.esd(), None);
        assert_eq!(d.source_name(), "stepco.inp");
    }

    #[test]
    fn test_append_zero_column() {
        let mut t = table(vec![vec![10.5], vec![12.25]]);
        t.append_zero_column();
        assert_eq!(t.columns, 2);
        assert_eq!(t.rows[1], vec![12.25, 0.0]);
    }

    #[test]
    fn test_session_indices_are_independent() {
        let mut a = Session::new();
        let mut b = Session::new();
        let d0 = a.dataset(table(vec![vec![1.0, 2.0]]), "a0");
        let d1 = a.dataset(table(vec![vec![1.0, 2.0]]), "a1");
        let e0 = b.dataset(table(vec![vec![1.0, 2.0]]), "b0");
        assert_eq!((d0.index(), d1.index(), e0.index()), (0, 1, 0));
        assert_eq!(a.created(), 2);
    }
}
