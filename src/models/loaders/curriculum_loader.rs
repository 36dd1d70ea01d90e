use crate::error::{AppError, AppResult, FileError};
use crate::models::curriculum::{CurriculumRow, CurriculumTable};
use serde_json::Value as JsonValue;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// 从文件加载课程表
///
/// 支持两种格式（按扩展名判断）：
/// - `.json`：顶层为数组，每个元素是 `{grade, semester, subjects}`
/// - `.toml`：`[[curriculum]]` 表数组
///
/// 格式不对的行会被跳过，不会让整个加载失败。
pub async fn load_curriculum(path: &Path) -> AppResult<CurriculumTable> {
    let path_str = path.display().to_string();

    if !path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let value: JsonValue = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| AppError::file_parse_failed(&path_str, e))?,
        Some("toml") => {
            toml::from_str(&content).map_err(|e| AppError::file_parse_failed(&path_str, e))?
        }
        _ => return Err(FileError::UnsupportedFormat { path: path_str }.into()),
    };

    let table = parse_curriculum_value(&value);
    info!("✓ 课程表加载完成: {} 行 ({})", table.rows.len(), path_str);
    Ok(table)
}

/// 加载课程表，失败时返回空表
///
/// 空表意味着没有允许/禁止主题，出题不做过滤。
pub async fn load_curriculum_or_empty(path: &Path) -> CurriculumTable {
    match load_curriculum(path).await {
        Ok(table) => table,
        Err(e) => {
            warn!("⚠️ 课程表加载失败，按无约束模式继续: {}", e);
            CurriculumTable::default()
        }
    }
}

/// 把已解析的 JSON 值转换为课程表
pub fn parse_curriculum_value(value: &JsonValue) -> CurriculumTable {
    let items: &[JsonValue] = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(map) => map
            .get("curriculum")
            .and_then(|v| v.as_array())
            .map(|v| v.as_slice())
            .unwrap_or(&[]),
        _ => &[],
    };

    let rows = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<CurriculumRow>(item.clone()) {
            Ok(row) => Some(row),
            Err(e) => {
                debug!("跳过课程表第 {} 行: {}", idx + 1, e);
                None
            }
        })
        .collect();

    CurriculumTable::new(rows)
}
