//! # 数据导出
//!
//! 导出背景 / 扣除结果和锚点。
//!
//! ## 支持格式
//! - XY: 两列定宽文本 (`%15.6f%15.2f`)，与其他精修程序交换数据
//! - CSV: 锚点 (x, y)，带表头，可再次读入
//!
//! ## 依赖关系
//! - 被 `background/corrector.rs`, `background/editor.rs`, `commands/` 调用
//! - 使用 `csv` + `serde` 读写锚点

use crate::error::{LinesError, Result};
use crate::models::{BackgroundPointSet, Point};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 格式化一行定宽 x / y
pub fn format_xy_line(x: f64, y: f64) -> String {
    format!("{:15.6}{:15.2}", x, y)
}

/// 写出两列定宽数据，已存在的文件被覆盖
pub fn write_xy_columns(data: &[(f64, f64)], output_path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| LinesError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    for (x, y) in data {
        writeln!(writer, "{}", format_xy_line(*x, *y)).map_err(write_err)?;
    }

    writer.flush().map_err(write_err)?;
    Ok(())
}

/// 导出锚点为 CSV
pub fn anchors_to_csv(anchors: &BackgroundPointSet, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for point in anchors.points() {
        wtr.serialize(point)?;
    }

    wtr.flush().map_err(|e| LinesError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 从 CSV 读取锚点
pub fn anchors_from_csv(input_path: &Path) -> Result<BackgroundPointSet> {
    if !input_path.is_file() {
        return Err(LinesError::FileNotFound {
            path: input_path.display().to_string(),
        });
    }

    let mut rdr = csv::Reader::from_path(input_path)?;
    let points = rdr
        .deserialize::<Point>()
        .collect::<std::result::Result<Vec<Point>, csv::Error>>()?;

    Ok(BackgroundPointSet::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_format_xy_line() {
        assert_eq!(format_xy_line(10.5, 1234.567), "      10.500000        1234.57");
    }

    #[test]
    fn test_anchor_csv_round_trip() {
        let dir = std::env::temp_dir().join(format!("lines-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("anchors.csv");

        let mut anchors = BackgroundPointSet::new();
        anchors.add_point(20.0, 95.5);
        anchors.add_point(10.0, 120.25);
        anchors_to_csv(&anchors, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("x,y\n"));

        let loaded = anchors_from_csv(&path).unwrap();
        assert_eq!(loaded.points(), anchors.points());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_csv() {
        let path = std::env::temp_dir().join("lines-test-no-such-anchors.csv");
        assert!(matches!(
            anchors_from_csv(&path),
            Err(LinesError::FileNotFound { .. })
        ));
    }
}
