use serde::{Deserialize, Serialize};

/// 课程表中的一行：某学年某学期的单元列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRow {
    pub grade: u32,
    pub semester: u32,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl CurriculumRow {
    pub fn new(grade: u32, semester: u32, subjects: &[&str]) -> Self {
        Self {
            grade,
            semester,
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 课程表
///
/// 为空时表示"没有课程约束"，出题照常进行但不做主题过滤。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumTable {
    pub rows: Vec<CurriculumRow>,
}

impl CurriculumTable {
    pub fn new(rows: Vec<CurriculumRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 与 (grade, semester) 完全匹配的单元，保持表内顺序
    pub fn units_for(&self, grade: u32, semester: u32) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.grade == grade && row.semester == semester)
            .flat_map(|row| row.subjects.iter().cloned())
            .collect()
    }
}

/// 某学年学期的出题范围
///
/// 两个列表都已去重，并按字符数降序、再按字典序排列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPolicy {
    pub allowed: Vec<String>,
    pub banned: Vec<String>,
}

impl TopicPolicy {
    pub fn is_unrestricted(&self) -> bool {
        self.banned.is_empty()
    }
}
