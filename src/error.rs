//! # 统一错误处理模块
//!
//! 定义 lines 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// lines 统一错误类型
#[derive(Error, Debug)]
pub enum LinesError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 格式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed input in {source_name} (line {line}): {reason}")]
    FormatError {
        source_name: String,
        line: usize,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 背景点不足
    // ─────────────────────────────────────────────────────────────
    #[error("Interpolation needs at least {required} points, got {found}")]
    InsufficientPoints { required: usize, found: usize },

    #[error("Background correction needs at least {required} anchor points, got {found}")]
    InsufficientAnchors { required: usize, found: usize },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // CSV / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),
}

impl LinesError {
    /// 构造格式错误
    pub fn format(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        LinesError::FormatError {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LinesError>;
