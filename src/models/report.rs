use serde::{Deserialize, Serialize};

use crate::models::problem::{ChoiceLetter, Choices};

/// 单题评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedItem {
    pub number: u32,
    pub stem: String,
    pub choices: Choices,
    /// 答案表中没有该题时为 None
    pub correct_letter: Option<ChoiceLetter>,
    /// 学生未作答时为 None
    pub student_letter: Option<ChoiceLetter>,
    pub is_correct: bool,
}

impl GradedItem {
    pub fn mark(&self) -> &'static str {
        if self.is_correct {
            "O"
        } else {
            "X"
        }
    }
}

/// 整张卷子的评分汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_problems: usize,
    pub correct_count: usize,
    /// 0-100
    pub score_percent: u32,
    pub items: Vec<GradedItem>,
}

impl ScoreReport {
    /// 答错（含未作答）的题号，按卷面顺序
    pub fn wrong_numbers(&self) -> Vec<u32> {
        self.items
            .iter()
            .filter(|item| !item.is_correct)
            .map(|item| item.number)
            .collect()
    }
}

/// 反馈档位，只由分数决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackTier {
    /// score >= 90
    Commendation,
    /// 70 <= score < 90
    Encouragement,
    /// score < 70
    Remediation,
}

impl FeedbackTier {
    pub fn for_score(score_percent: u32) -> Self {
        match score_percent {
            s if s >= 90 => FeedbackTier::Commendation,
            s if s >= 70 => FeedbackTier::Encouragement,
            _ => FeedbackTier::Remediation,
        }
    }
}

/// 单题解析（装饰性文本）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub number: u32,
    pub body: String,
    /// 是否使用了固定的兜底文本
    pub is_fallback: bool,
}
