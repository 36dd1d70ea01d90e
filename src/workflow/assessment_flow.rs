//! 评分流程 - 流程层
//!
//! 流程顺序：
//! 1. 解析教材文本（卷面 + 答案）和学生作答
//! 2. 确定性评分
//! 3. 生成解析（失败时兜底）
//! 4. 分档反馈并输出四段式报告

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::TextGenerator;
use crate::config::Config;
use crate::error::AppResult;
use crate::grading::grader::grade;
use crate::grading::report::{feedback_for, render_report, Feedback};
use crate::models::report::{Explanation, ScoreReport};
use crate::parser::{parse_responses, parse_worksheet};
use crate::services::ExplanationService;
use crate::utils::logging::log_score_summary;

/// 评分结果
#[derive(Debug, Clone)]
pub struct AssessmentResult {
    pub report: ScoreReport,
    pub explanations: Vec<Explanation>,
    pub feedback: Feedback,
    /// `[Score]`/`[PerQuestion]`/`[Explanations]`/`[Feedback]` 四段文本
    pub rendered: String,
}

/// 评分流程
pub struct AssessmentFlow {
    explanation_service: ExplanationService,
    verbose_logging: bool,
}

impl AssessmentFlow {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        Self {
            explanation_service: ExplanationService::new(generator),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 评分不依赖生成器；解析失败只影响解析文字
    pub async fn run(&self, materials_text: &str, responses_text: &str) -> AppResult<AssessmentResult> {
        let worksheet = parse_worksheet(materials_text);
        let responses = parse_responses(responses_text);

        if worksheet.answer_key.is_empty() {
            warn!("⚠️ 教材文本中没有答案，所有题目都会判为错误");
        }

        let report = grade(&worksheet.problems, &worksheet.answer_key, &responses);
        log_score_summary(&report);

        let explanations = self.explanation_service.explain(&report).await;
        if self.verbose_logging {
            let fallback_count = explanations.iter().filter(|e| e.is_fallback).count();
            info!("兜底解析 {}/{} 条", fallback_count, explanations.len());
        }

        let feedback = feedback_for(&report);
        let rendered = render_report(&report, &explanations);

        Ok(AssessmentResult {
            report,
            explanations,
            feedback,
            rendered,
        })
    }
}
