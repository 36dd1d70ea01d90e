//! 解析服务 - 业务能力层
//!
//! 只负责"给已评分的题目配上解析文字"。
//! 解析是装饰性的：调用失败或返回无法解析时，逐题使用固定兜底文本，
//! 永远不会让评分结果失败。

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::TextGenerator;
use crate::grading::report::FALLBACK_EXPLANATION;
use crate::models::problem::Choices;
use crate::models::report::{Explanation, ScoreReport};
use crate::parser::explanations::parse_explanations;

/// 解析系统提示词
pub const EXPLANATION_SYSTEM_PROMPT: &str = "한국 초등 수학 해설 작성기. 주어진 문항(stem)과 선택지(choices)를 참고해, 각 문항의 해설 본문만 1~3문장으로 작성. \
정답 글자(A/B/C/D)나 학생 선택, 점수, Correct/O/X는 출력하지 말 것. 새 문제를 만들지 말 것.";

/// 发给生成器的单题信息
#[derive(Debug, Serialize)]
struct ExplanationPayloadItem<'a> {
    number: u32,
    stem: &'a str,
    choices: &'a Choices,
    correct: &'static str,
    student: &'static str,
    ok: bool,
}

#[derive(Debug, Serialize)]
struct ExplanationPayload<'a> {
    items: Vec<ExplanationPayloadItem<'a>>,
}

/// 解析服务
pub struct ExplanationService {
    generator: Arc<dyn TextGenerator>,
}

impl ExplanationService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 构建解析请求的用户消息
    pub fn build_user_prompt(&self, report: &ScoreReport) -> String {
        let payload = ExplanationPayload {
            items: report
                .items
                .iter()
                .map(|item| ExplanationPayloadItem {
                    number: item.number,
                    stem: &item.stem,
                    choices: &item.choices,
                    correct: item.correct_letter.map(|l| l.as_str()).unwrap_or(""),
                    student: item.student_letter.map(|l| l.as_str()).unwrap_or(""),
                    ok: item.is_correct,
                })
                .collect(),
        };

        let payload_json = serde_json::to_string(&payload).unwrap_or_default();

        format!(
            "다음 JSON을 참고하여 각 번호별로 한 줄씩 'n) 해설: ...' 형식으로 출력하세요. \
틀린 문항은 더 자세하고 친절하게, 쉬운 예 1개를 포함하세요.\n\nJSON:\n{}",
            payload_json
        )
    }

    /// 为每道题生成解析
    ///
    /// 返回值与 `report.items` 一一对应、顺序一致。
    /// 只返回解析正文，答错提示由报告输出时追加。
    pub async fn explain(&self, report: &ScoreReport) -> Vec<Explanation> {
        if report.items.is_empty() {
            return Vec::new();
        }

        let prompt = self.build_user_prompt(report);
        let raw = match self
            .generator
            .generate(EXPLANATION_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ 解析生成失败，全部使用兜底文本: {}", e);
                String::new()
            }
        };

        let bodies = parse_explanations(&raw);
        debug!(
            "解析生成完成: {}/{} 道题有解析",
            bodies.len(),
            report.items.len()
        );

        report
            .items
            .iter()
            .map(|item| {
                let (body, is_fallback) = match bodies.get(&item.number) {
                    Some(body) => (body.clone(), false),
                    None => (FALLBACK_EXPLANATION.to_string(), true),
                };
                Explanation {
                    number: item.number,
                    body,
                    is_fallback,
                }
            })
            .collect()
    }
}
