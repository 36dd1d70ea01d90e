//! 按学年学期划分允许/禁止主题

use tracing::debug;

use crate::models::curriculum::{CurriculumTable, TopicPolicy};
use crate::policy::terms::sort_terms;

/// 课程表中找不到单元时使用的默认主题
pub const FALLBACK_TOPIC: &str = "기본 연산";

/// 当前及以前学期的全部单元
pub fn allowed_topics(table: &CurriculumTable, grade: u32, semester: u32) -> Vec<String> {
    sort_terms(
        table
            .rows
            .iter()
            .filter(|row| row.grade < grade || (row.grade == grade && row.semester <= semester))
            .flat_map(|row| row.subjects.iter().cloned()),
    )
}

/// 之后学期的全部单元
pub fn banned_topics(table: &CurriculumTable, grade: u32, semester: u32) -> Vec<String> {
    sort_terms(
        table
            .rows
            .iter()
            .filter(|row| row.grade > grade || (row.grade == grade && row.semester > semester))
            .flat_map(|row| row.subjects.iter().cloned()),
    )
}

/// 计算某学年学期的出题范围
///
/// 同一单元名若同时出现在前后学期，会同时出现在两个列表里。
pub fn topic_policy(table: &CurriculumTable, grade: u32, semester: u32) -> TopicPolicy {
    let policy = TopicPolicy {
        allowed: allowed_topics(table, grade, semester),
        banned: banned_topics(table, grade, semester),
    };
    debug!(
        "{}학년 {}학기 出题范围: 允许 {} 个, 禁止 {} 个",
        grade,
        semester,
        policy.allowed.len(),
        policy.banned.len()
    );
    policy
}

/// 选择本次出题的单元
///
/// 指定的单元属于本学期时优先使用，否则取本学期第一个单元，
/// 本学期没有单元时退回 [`FALLBACK_TOPIC`]。
pub fn select_topic(
    table: &CurriculumTable,
    grade: u32,
    semester: u32,
    requested: Option<&str>,
) -> String {
    let units = table.units_for(grade, semester);

    if let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) {
        if units.iter().any(|u| u == requested) {
            return requested.to_string();
        }
        debug!("指定单元 {} 不在本学期课程中，改用默认选择", requested);
    }

    units
        .into_iter()
        .next()
        .unwrap_or_else(|| FALLBACK_TOPIC.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::curriculum::CurriculumRow;

    fn sample_table() -> CurriculumTable {
        CurriculumTable::new(vec![
            CurriculumRow::new(1, 1, &["덧셈"]),
            CurriculumRow::new(1, 2, &["뺄셈"]),
            CurriculumRow::new(2, 1, &["곱셈"]),
        ])
    }

    #[test]
    fn test_policy_scenario() {
        let policy = topic_policy(&sample_table(), 1, 2);
        assert_eq!(policy.allowed, vec!["덧셈", "뺄셈"]);
        assert_eq!(policy.banned, vec!["곱셈"]);
    }

    #[test]
    fn test_first_semester_bans_everything_later() {
        let policy = topic_policy(&sample_table(), 1, 1);
        assert_eq!(policy.allowed, vec!["덧셈"]);
        assert_eq!(policy.banned, vec!["곱셈", "뺄셈"]);
    }

    #[test]
    fn test_last_grade_bans_nothing() {
        let policy = topic_policy(&sample_table(), 6, 2);
        assert_eq!(policy.allowed.len(), 3);
        assert!(policy.banned.is_empty());
        assert!(policy.is_unrestricted());
    }

    #[test]
    fn test_empty_table_gives_empty_policy() {
        let policy = topic_policy(&CurriculumTable::default(), 3, 1);
        assert!(policy.allowed.is_empty());
        assert!(policy.banned.is_empty());
    }

    #[test]
    fn test_repeated_unit_appears_in_both_lists() {
        let table = CurriculumTable::new(vec![
            CurriculumRow::new(3, 1, &["분수"]),
            CurriculumRow::new(4, 1, &["분수"]),
        ]);
        let policy = topic_policy(&table, 3, 1);
        assert_eq!(policy.allowed, vec!["분수"]);
        assert_eq!(policy.banned, vec!["분수"]);
    }

    #[test]
    fn test_select_topic() {
        let table = CurriculumTable::new(vec![CurriculumRow::new(2, 1, &["세 자리 수", "곱셈"])]);
        assert_eq!(select_topic(&table, 2, 1, Some("곱셈")), "곱셈");
        assert_eq!(select_topic(&table, 2, 1, Some("미분")), "세 자리 수");
        assert_eq!(select_topic(&table, 2, 1, None), "세 자리 수");
        assert_eq!(select_topic(&table, 5, 2, None), FALLBACK_TOPIC);
    }
}
