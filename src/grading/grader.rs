//! 确定性评分
//!
//! 对错只由答案表和学生作答决定，从不参考 LLM 输出。

use tracing::debug;

use crate::models::problem::{AnswerKey, Problem, StudentResponseMap};
use crate::models::report::{GradedItem, ScoreReport};

/// 百分制得分，四舍五入（0.5 向上）
///
/// `total == 0` 时为 0。
pub fn score_percent(correct_count: usize, total_problems: usize) -> u32 {
    if total_problems == 0 {
        return 0;
    }
    let correct = correct_count.min(total_problems) as u64;
    let total = total_problems as u64;
    ((200 * correct + total) / (2 * total)) as u32
}

/// 评分
///
/// 按解析器给出的题目顺序逐题比对；答案表或作答缺失的题一律判错。
pub fn grade(
    problems: &[Problem],
    answer_key: &AnswerKey,
    responses: &StudentResponseMap,
) -> ScoreReport {
    let items: Vec<GradedItem> = problems
        .iter()
        .map(|problem| {
            let correct_letter = answer_key.get(&problem.number).copied();
            let student_letter = responses.get(&problem.number).copied();
            let is_correct = matches!(
                (correct_letter, student_letter),
                (Some(correct), Some(student)) if correct == student
            );

            GradedItem {
                number: problem.number,
                stem: problem.stem.clone(),
                choices: problem.choices.clone(),
                correct_letter,
                student_letter,
                is_correct,
            }
        })
        .collect();

    let total_problems = items.len();
    let correct_count = items.iter().filter(|item| item.is_correct).count();
    let score = score_percent(correct_count, total_problems);

    debug!(
        "评分完成: {}/{} 正确, 得分 {}",
        correct_count, total_problems, score
    );

    ScoreReport {
        total_problems,
        correct_count,
        score_percent: score,
        items,
    }
}
