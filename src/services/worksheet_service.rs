//! 出题服务 - 业务能力层
//!
//! 只负责"生成一份不越界的卷子文本"：
//! - 提示词中写明允许/禁止主题
//! - 每次生成后检查禁止词，命中则带纠正提示重新生成
//! - 重试用尽仍命中时接受最后一次结果，并在返回值中标明

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::TextGenerator;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::curriculum::TopicPolicy;
use crate::policy::terms::{expand_terms, find_banned_term};

/// 出题系统提示词
pub const WORKSHEET_SYSTEM_PROMPT: &str = "너는 한국 초등 수학 출제 교사다. 반드시 모호성 없이, 정답이 하나만 되도록 출제한다. \
현재 학기까지 배운 개념만 사용하고, 응용은 과거 학기 개념과만 혼합한다. 상위 학년 개념 금지.";

/// 重试时追加的纠正提示
pub const RETRY_NOTICE: &str =
    "\n\n이전 시도에서 금지 주제가 포함되었습니다. 금지 주제를 절대 사용하지 말고 다시 출제하세요.";

const EXTRA_REQUEST_MAX_CHARS: usize = 100;
const GUIDE_MAX_CHARS: usize = 1000;

/// 一次出题请求
#[derive(Debug, Clone, Default)]
pub struct WorksheetRequest {
    pub grade: u32,
    pub semester: u32,
    pub topic: String,
    /// 额外要求，最多取前 100 个字符
    pub extra_request: Option<String>,
    /// 教学指南摘录，最多取前 1000 个字符
    pub guide: Option<String>,
}

/// 合规检查结论
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ComplianceVerdict {
    /// 未检出禁止词
    Verified,
    /// 重试用尽后仍检出禁止词，按最后一次结果接受
    AcceptedOnExhaustion { matched_term: String },
}

/// 出题结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub text: String,
    /// 实际调用生成器的次数
    pub attempts: usize,
    pub verdict: ComplianceVerdict,
}

impl GenerationOutcome {
    pub fn is_verified(&self) -> bool {
        self.verdict == ComplianceVerdict::Verified
    }
}

/// 出题服务
///
/// 职责：
/// - 构建出题提示词
/// - 顺序调用生成器，最多 `max_retries + 1` 次
/// - 不解析卷子，不关心评分
pub struct WorksheetService {
    generator: Arc<dyn TextGenerator>,
    max_retries: usize,
    topic_limit: usize,
}

impl WorksheetService {
    /// 创建新的出题服务
    pub fn new(generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        Self {
            generator,
            max_retries: config.max_generation_retries,
            topic_limit: config.prompt_topic_limit,
        }
    }

    /// 构建首轮出题提示词
    pub fn build_prompt(&self, request: &WorksheetRequest, policy: &TopicPolicy) -> String {
        let mut prompt = format!(
            r#"{grade}학년 {semester}학기 수학 "{topic}" 단원에서 4지선다 문제 5개를 출제하세요.

반드시 아래 형식을 그대로 지키세요.

[Worksheet]
[Problem 1] 문제 내용
Choices: A) 보기 B) 보기 C) 보기 D) 보기
[Problem 2] ...

[AnswerKey]
1) 정답 알파벳
2) ..."#,
            grade = request.grade,
            semester = request.semester,
            topic = request.topic
        );

        prompt.push_str("\n\n[허용 주제]\n- ");
        prompt.push_str(&format_topic_list(&policy.allowed, self.topic_limit));
        prompt.push_str("\n\n[금지 주제]\n- ");
        prompt.push_str(&format_topic_list(&policy.banned, self.topic_limit));
        prompt.push_str("\n\n주의: 문항은 허용 주제 범위에서만 출제하고, 금지 주제가 언급되면 무효입니다.");

        if let Some(guide) = request.guide.as_deref().filter(|g| !g.trim().is_empty()) {
            prompt.push_str("\n\n[교육과정 가이드 참고]\n");
            prompt.push_str(&take_chars(guide, GUIDE_MAX_CHARS));
        }

        if let Some(extra) = request.extra_request.as_deref().filter(|e| !e.trim().is_empty()) {
            prompt.push_str("\n\n[추가 요청]\n");
            prompt.push_str(&take_chars(extra.trim(), EXTRA_REQUEST_MAX_CHARS));
        }

        prompt
    }

    /// 生成一份合规的卷子文本
    ///
    /// 生成器调用失败直接返回错误；内容不合规不算错误。
    pub async fn generate_compliant_worksheet(
        &self,
        request: &WorksheetRequest,
        policy: &TopicPolicy,
    ) -> AppResult<GenerationOutcome> {
        let banned_terms = expand_terms(&policy.banned);
        let base_prompt = self.build_prompt(request, policy);
        let max_attempts = self.max_retries.saturating_add(1);

        let mut text = String::new();
        let mut matched_term = String::new();

        for attempt in 0..max_attempts {
            let prompt = if attempt == 0 {
                base_prompt.clone()
            } else {
                format!("{}{}", base_prompt, RETRY_NOTICE)
            };

            info!(
                "📝 出题 {}학년 {}학기 [{}] 第 {}/{} 次",
                request.grade,
                request.semester,
                request.topic,
                attempt + 1,
                max_attempts
            );

            text = self
                .generator
                .generate(WORKSHEET_SYSTEM_PROMPT, &prompt)
                .await?;

            match find_banned_term(&text, &banned_terms) {
                None => {
                    info!("✓ 第 {} 次出题通过范围检查", attempt + 1);
                    return Ok(GenerationOutcome {
                        text,
                        attempts: attempt + 1,
                        verdict: ComplianceVerdict::Verified,
                    });
                }
                Some(term) => {
                    warn!("⚠️ 第 {} 次出题包含禁止主题: {}", attempt + 1, term);
                    matched_term = term.to_string();
                }
            }
        }

        warn!(
            "⚠️ 重试 {} 次后仍包含禁止主题 ({})，接受最后一次结果",
            self.max_retries, matched_term
        );

        Ok(GenerationOutcome {
            text,
            attempts: max_attempts,
            verdict: ComplianceVerdict::AcceptedOnExhaustion { matched_term },
        })
    }
}

/// 最多列出 `limit` 个主题；为空时写 "(없음)"
fn format_topic_list(topics: &[String], limit: usize) -> String {
    if topics.is_empty() {
        return "(없음)".to_string();
    }
    topics
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n- ")
}

fn take_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::topics::topic_policy;
    use crate::test_utils::fakes::ScriptedGenerator;
    use crate::test_utils::fixtures::{sample_curriculum, BANNED_WORKSHEET, CLEAN_WORKSHEET};

    fn request() -> WorksheetRequest {
        WorksheetRequest {
            grade: 1,
            semester: 2,
            topic: "뺄셈".to_string(),
            ..WorksheetRequest::default()
        }
    }

    fn service(generator: Arc<ScriptedGenerator>) -> WorksheetService {
        WorksheetService::new(generator, &Config::default())
    }

    #[tokio::test]
    async fn test_clean_first_attempt_stops() {
        let generator = Arc::new(ScriptedGenerator::replying(&[CLEAN_WORKSHEET, BANNED_WORKSHEET]));
        let policy = topic_policy(&sample_curriculum(), 1, 2);

        let outcome = service(generator.clone())
            .generate_compliant_worksheet(&request(), &policy)
            .await
            .unwrap();

        assert!(outcome.is_verified());
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.text, CLEAN_WORKSHEET);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_banned_content() {
        let generator = Arc::new(ScriptedGenerator::replying(&[BANNED_WORKSHEET, CLEAN_WORKSHEET]));
        let policy = topic_policy(&sample_curriculum(), 1, 2);

        let outcome = service(generator.clone())
            .generate_compliant_worksheet(&request(), &policy)
            .await
            .unwrap();

        assert!(outcome.is_verified());
        assert_eq!(outcome.attempts, 2);

        let calls = generator.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].1.contains(RETRY_NOTICE));
        assert!(calls[1].1.ends_with(RETRY_NOTICE));
        assert_eq!(calls[1].0, WORKSHEET_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_exhaustion_accepts_last_attempt() {
        let last = format!("{}\n마지막", BANNED_WORKSHEET);
        let generator = Arc::new(ScriptedGenerator::replying(&[
            BANNED_WORKSHEET,
            BANNED_WORKSHEET,
            last.as_str(),
            CLEAN_WORKSHEET,
        ]));
        let policy = topic_policy(&sample_curriculum(), 1, 2);

        let outcome = service(generator.clone())
            .generate_compliant_worksheet(&request(), &policy)
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 3);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.text, last);
        assert_eq!(
            outcome.verdict,
            ComplianceVerdict::AcceptedOnExhaustion {
                matched_term: "곱셈".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let policy = TopicPolicy::default();

        let result = service(generator)
            .generate_compliant_worksheet(&request(), &policy)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_compound_banned_topic_detected_by_fragment() {
        // 禁止主题 "분수와 소수" 展开后，单独出现的 "소수" 也会被拦下
        let with_fragment = "[Worksheet]\n[Problem 1] 소수 0.5는?\nChoices: A) 1 B) 2 C) 3 D) 4";
        let generator = Arc::new(ScriptedGenerator::replying(&[with_fragment, CLEAN_WORKSHEET]));
        let policy = topic_policy(&sample_curriculum(), 1, 2);

        let outcome = service(generator)
            .generate_compliant_worksheet(&request(), &policy)
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 2);
    }

    #[test]
    fn test_prompt_lists_policy() {
        let generator = Arc::new(ScriptedGenerator::replying(&[]));
        let policy = topic_policy(&sample_curriculum(), 1, 2);
        let prompt = service(generator).build_prompt(&request(), &policy);

        assert!(prompt.contains("1학년 2학기 수학 \"뺄셈\""));
        assert!(prompt.contains("[허용 주제]\n- "));
        assert!(prompt.contains("- 곱셈"));
        assert!(prompt.contains("금지 주제가 언급되면 무효"));
        assert!(!prompt.contains("[추가 요청]"));
    }

    #[test]
    fn test_prompt_marks_empty_banned_list() {
        let generator = Arc::new(ScriptedGenerator::replying(&[]));
        let prompt = service(generator).build_prompt(&request(), &TopicPolicy::default());
        assert!(prompt.contains("[금지 주제]\n- (없음)"));
    }

    #[test]
    fn test_prompt_limits_topics_and_extras() {
        let generator = Arc::new(ScriptedGenerator::replying(&[]));
        let policy = TopicPolicy {
            allowed: (0..20).map(|i| format!("주제{:02}", i)).collect(),
            banned: Vec::new(),
        };
        let request = WorksheetRequest {
            extra_request: Some("가".repeat(150)),
            guide: Some("나".repeat(1200)),
            ..request()
        };
        let prompt = service(generator).build_prompt(&request, &policy);

        assert!(prompt.contains("주제11"));
        assert!(!prompt.contains("주제12"));
        assert!(prompt.contains(&format!("[추가 요청]\n{}", "가".repeat(100))));
        assert!(!prompt.contains(&"가".repeat(101)));
        assert!(prompt.contains(&"나".repeat(1000)));
        assert!(!prompt.contains(&"나".repeat(1001)));
    }

    #[tokio::test]
    async fn test_shipped_curriculum_accepts_clean_first_grade_worksheet() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("resource/curriculum.json");
        let curriculum = crate::models::loaders::load_curriculum(&path).await.unwrap();
        let policy = topic_policy(&curriculum, 1, 1);
        assert!(!policy.banned.is_empty());

        let generator = Arc::new(ScriptedGenerator::replying(&[
            CLEAN_WORKSHEET,
            CLEAN_WORKSHEET,
            CLEAN_WORKSHEET,
        ]));
        let request = WorksheetRequest {
            grade: 1,
            semester: 1,
            topic: "덧셈과 뺄셈".to_string(),
            ..WorksheetRequest::default()
        };

        let outcome = service(generator.clone())
            .generate_compliant_worksheet(&request, &policy)
            .await
            .unwrap();

        assert_eq!(outcome.verdict, ComplianceVerdict::Verified);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_huge_retry_count_does_not_overflow() {
        let config = Config {
            max_generation_retries: usize::MAX,
            ..Config::default()
        };
        let generator = Arc::new(ScriptedGenerator::replying(&[CLEAN_WORKSHEET]));
        let outcome = WorksheetService::new(generator, &config)
            .generate_compliant_worksheet(&request(), &TopicPolicy::default())
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 1);
    }
}
