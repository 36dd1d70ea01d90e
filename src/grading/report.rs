//! 评分结果的文本输出
//!
//! 输出分四段：`[Score]`、`[PerQuestion]`、`[Explanations]`、`[Feedback]`。
//! 每段都只由 `ScoreReport` 推导，正确选项永远取自评分结果。

use crate::models::problem::ChoiceLetter;
use crate::models::report::{Explanation, FeedbackTier, GradedItem, ScoreReport};

pub const SCORE_SECTION: &str = "[Score]";
pub const PER_QUESTION_SECTION: &str = "[PerQuestion]";
pub const EXPLANATIONS_SECTION: &str = "[Explanations]";
pub const FEEDBACK_SECTION: &str = "[Feedback]";

/// 解析缺失时的固定文本
pub const FALLBACK_EXPLANATION: &str = "간단한 풀이 과정을 따라 정답 보기를 확인해 보세요.";

/// 答错的题目在解析后追加的提示
pub const WRONG_ANSWER_SUFFIX: &str = " 추가로, 비슷한 쉬운 예를 만들어 연습해 보세요.";

/// 按分数档位生成的反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub tier: FeedbackTier,
    pub message: String,
}

fn letter_or_dash(letter: Option<ChoiceLetter>) -> &'static str {
    letter.map(ChoiceLetter::as_str).unwrap_or("-")
}

/// `[Score]` 段
pub fn render_score(report: &ScoreReport) -> String {
    format!("{}\n총점: {} 점\n\n", SCORE_SECTION, report.score_percent)
}

/// 单题一行：学生选项 | 正确选项 | O/X
pub fn per_question_line(item: &GradedItem) -> String {
    format!(
        "{}) 학생: ({}) | 정답: ({}) | 채점: {}",
        item.number,
        letter_or_dash(item.student_letter),
        letter_or_dash(item.correct_letter),
        item.mark()
    )
}

/// `[PerQuestion]` 段
pub fn render_per_question(report: &ScoreReport) -> String {
    let mut lines = vec![PER_QUESTION_SECTION.to_string()];
    lines.extend(report.items.iter().map(per_question_line));
    lines.join("\n") + "\n\n"
}

/// `[Explanations]` 段
///
/// 按题号把解析挂到评分结果上；找不到解析的题使用兜底文本。
/// 答错的题统一在这里追加练习提示，传入的解析正文不应自带提示。
pub fn render_explanations(report: &ScoreReport, explanations: &[Explanation]) -> String {
    let mut lines = vec![EXPLANATIONS_SECTION.to_string()];

    for item in &report.items {
        let body = explanations
            .iter()
            .find(|e| e.number == item.number)
            .map(|e| e.body.as_str())
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(FALLBACK_EXPLANATION);
        lines.push(format!(
            "{}) 정답: ({}) - {}",
            item.number,
            letter_or_dash(item.correct_letter),
            decorate_body(body, item.is_correct)
        ));
    }

    lines.join("\n") + "\n\n"
}

/// 答错的题在解析后追加练习提示
pub fn decorate_body(body: &str, is_correct: bool) -> String {
    if is_correct || body.is_empty() {
        body.to_string()
    } else {
        format!("{}{}", body, WRONG_ANSWER_SUFFIX)
    }
}

/// 按分数档位生成反馈
pub fn feedback_for(report: &ScoreReport) -> Feedback {
    let tier = FeedbackTier::for_score(report.score_percent);
    let wrong = report.wrong_numbers();
    let wrong_note = if wrong.is_empty() {
        String::new()
    } else {
        let numbers: Vec<String> = wrong.iter().map(u32::to_string).collect();
        format!("틀린 문항: {}. ", numbers.join(", "))
    };

    let message = match tier {
        FeedbackTier::Commendation => {
            "아주 훌륭해요! 개념 이해가 잘 되어 있어요. 다음에는 응용 문제에 더 도전해 봅시다."
                .to_string()
        }
        FeedbackTier::Encouragement => format!(
            "좋아요! 조금만 더 연습하면 더 높은 점수를 받을 수 있어요. {}틀린 유형의 개념을 복습해 봅시다.",
            wrong_note
        ),
        FeedbackTier::Remediation => format!(
            "괜찮아요, 기초부터 차근차근 다시 연습해 볼까요? {}덧셈/뺄셈/도형 기초를 복습하고 쉬운 문제부터 풀어봐요.",
            wrong_note
        ),
    };

    Feedback { tier, message }
}

/// `[Feedback]` 段
pub fn render_feedback(feedback: &Feedback) -> String {
    format!("{}\n{}\n", FEEDBACK_SECTION, feedback.message)
}

/// 拼接全部四段
pub fn render_report(report: &ScoreReport, explanations: &[Explanation]) -> String {
    let feedback = feedback_for(report);
    [
        render_score(report),
        render_per_question(report),
        render_explanations(report, explanations),
        render_feedback(&feedback),
    ]
    .concat()
}
