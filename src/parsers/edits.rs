//! # 编辑脚本解析器
//!
//! 以文本形式描述的锚点编辑事件，供命令行前端回放。
//!
//! ## 格式说明
//! ```text
//! # 注释
//! add    12.5   840.0      <- 添加锚点
//! remove 0 3               <- 按当前序号删除
//! pick   30.1   512.0  2.0 <- 删除距 (x, y) 最近的锚点（可选容差）
//! export                   <- 导出
//! ```
//!
//! ## 依赖关系
//! - 被 `background/editor.rs`, `commands/` 使用

use crate::error::{LinesError, Result};

use std::fs;
use std::path::Path;

/// 单个编辑事件
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    Add { x: f64, y: f64 },
    Remove(Vec<usize>),
    Pick { x: f64, y: f64, tolerance: f64 },
    Export,
}

/// 从字符串内容解析编辑脚本
pub fn parse_edit_script(content: &str, source_name: &str) -> Result<Vec<EditCommand>> {
    let mut commands = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let err = |reason: String| LinesError::format(source_name, line_no + 1, reason);

        let number = |token: &str| -> Result<f64> {
            token
                .parse::<f64>()
                .map_err(|_| err(format!("not a number: '{}'", token)))
        };

        let command = match parts[0].to_lowercase().as_str() {
            "add" => {
                if parts.len() != 3 {
                    return Err(err("usage: add X Y".to_string()));
                }
                EditCommand::Add {
                    x: number(parts[1])?,
                    y: number(parts[2])?,
                }
            }
            "remove" => {
                if parts.len() < 2 {
                    return Err(err("usage: remove I [J ...]".to_string()));
                }
                let indices = parts[1..]
                    .iter()
                    .map(|t| {
                        t.parse::<usize>()
                            .map_err(|_| err(format!("not an index: '{}'", t)))
                    })
                    .collect::<Result<Vec<usize>>>()?;
                EditCommand::Remove(indices)
            }
            "pick" => {
                if parts.len() != 3 && parts.len() != 4 {
                    return Err(err("usage: pick X Y [TOLERANCE]".to_string()));
                }
                let tolerance = match parts.get(3) {
                    Some(t) => number(t)?,
                    None => f64::INFINITY,
                };
                EditCommand::Pick {
                    x: number(parts[1])?,
                    y: number(parts[2])?,
                    tolerance,
                }
            }
            "export" => EditCommand::Export,
            other => return Err(err(format!("unknown edit command '{}'", other))),
        };

        commands.push(command);
    }

    Ok(commands)
}

/// 读取编辑脚本文件
pub fn load_edit_script(path: &Path) -> Result<Vec<EditCommand>> {
    let content = fs::read_to_string(path).map_err(|e| LinesError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_edit_script(&content, &path.display().to_string())
}
