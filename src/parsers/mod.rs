//! # 解析器模块
//!
//! 提供数据表格、stepco 指令文件、crplot 差值图以及编辑脚本的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `background/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: table, stepco, crplot, edits

pub mod crplot;
pub mod edits;
pub mod stepco;
pub mod table;

pub use crplot::{parse_crplot_file, DifferencePattern};
pub use edits::{load_edit_script, EditCommand};
pub use stepco::StepcoDocument;
pub use table::{load_dataset, load_tick_marks, TableOptions};
