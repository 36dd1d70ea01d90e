//! 出题流程 - 流程层
//!
//! 核心职责：定义"一次出题"的完整处理流程
//!
//! 流程顺序：
//! 1. 选择单元 → 计算允许/禁止主题
//! 2. （可选）检索教学指南
//! 3. 出题 + 范围检查（带重试）
//! 4. 解析卷子，拼出课文和教材文本

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{GuideRetriever, TextGenerator};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::curriculum::CurriculumTable;
use crate::models::problem::ParsedWorksheet;
use crate::parser::worksheet::{parse_worksheet, split_sections, ANSWER_KEY_MARKER};
use crate::policy::topics::{select_topic, topic_policy};
use crate::services::{GenerationOutcome, WorksheetRequest, WorksheetService};
use crate::utils::logging::truncate_text;

/// 参与拼接的指南文档数
const GUIDE_DOCUMENTS_USED: usize = 2;

/// 出题请求
#[derive(Debug, Clone, Default)]
pub struct LessonRequest {
    pub grade: u32,
    pub semester: u32,
    /// 指定单元；不属于本学期时忽略
    pub subject: Option<String>,
    pub extra_request: Option<String>,
}

/// 出题结果
#[derive(Debug, Clone)]
pub struct LessonMaterials {
    pub grade: u32,
    pub semester: u32,
    pub topic: String,
    /// 给学生看的课文：标题 + 卷面
    pub lesson: String,
    /// 卷面 + 答案，评分时原样传回
    pub materials_text: String,
    pub worksheet: ParsedWorksheet,
    pub outcome: GenerationOutcome,
}

/// 出题流程
///
/// - 编排选题、检索、出题、解析
/// - 课程表和外部能力都由构造方注入
pub struct LessonFlow {
    worksheet_service: WorksheetService,
    retriever: Option<Arc<dyn GuideRetriever>>,
    curriculum: CurriculumTable,
    guide_top_k: usize,
    verbose_logging: bool,
}

impl LessonFlow {
    /// 创建新的出题流程
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        retriever: Option<Arc<dyn GuideRetriever>>,
        curriculum: CurriculumTable,
        config: &Config,
    ) -> Self {
        Self {
            worksheet_service: WorksheetService::new(generator, config),
            retriever,
            curriculum,
            guide_top_k: config.guide_top_k,
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, request: &LessonRequest) -> AppResult<LessonMaterials> {
        let (grade, semester) = (request.grade, request.semester);

        // ========== 步骤 1: 选择单元和出题范围 ==========
        let topic = select_topic(
            &self.curriculum,
            grade,
            semester,
            request.subject.as_deref(),
        );
        let policy = topic_policy(&self.curriculum, grade, semester);
        if policy.is_unrestricted() {
            warn!("⚠️ {}학년 {}학기 没有可用的课程范围，出题不做主题过滤", grade, semester);
        }
        info!(
            "📚 {}학년 {}학기 单元: {} (允许 {} / 禁止 {})",
            grade,
            semester,
            topic,
            policy.allowed.len(),
            policy.banned.len()
        );

        // ========== 步骤 2: 检索教学指南 ==========
        let guide = self.retrieve_guide(grade, semester, &topic).await;

        // ========== 步骤 3: 出题 ==========
        let worksheet_request = WorksheetRequest {
            grade,
            semester,
            topic: topic.clone(),
            extra_request: request.extra_request.clone(),
            guide,
        };
        let outcome = self
            .worksheet_service
            .generate_compliant_worksheet(&worksheet_request, &policy)
            .await?;

        if self.verbose_logging {
            info!("生成文本: {}", truncate_text(&outcome.text, 200));
        }

        // ========== 步骤 4: 解析并拼接 ==========
        let (worksheet_text, key_text) = split_sections(&outcome.text);
        let worksheet = parse_worksheet(&outcome.text);

        let lesson = format!("[{}학년 {}학기] {}\n\n{}", grade, semester, topic, worksheet_text);
        let materials_text = if key_text.is_empty() {
            worksheet_text.to_string()
        } else {
            format!("{}\n\n{}\n{}", worksheet_text, ANSWER_KEY_MARKER, key_text)
        };

        if worksheet.problems.is_empty() {
            warn!("⚠️ 生成的卷子中没有解析出任何题目");
        } else {
            info!(
                "✓ 出题完成: {} 道题, 答案 {} 条, 共调用 {} 次",
                worksheet.problems.len(),
                worksheet.answer_key.len(),
                outcome.attempts
            );
        }

        Ok(LessonMaterials {
            grade,
            semester,
            topic,
            lesson,
            materials_text,
            worksheet,
            outcome,
        })
    }

    /// 检索失败或没有检索器时返回 None，不影响出题
    async fn retrieve_guide(&self, grade: u32, semester: u32, topic: &str) -> Option<String> {
        let retriever = self.retriever.as_ref()?;
        let query = format!(
            "{}학년 {}학기 수학 {} 단원 문제 출제 가이드 교육과정",
            grade, semester, topic
        );

        match retriever.search(&query, self.guide_top_k).await {
            Ok(mut documents) => {
                // 距离越小越靠前，没有距离的排最后
                documents.sort_by(|a, b| match (a.distance, b.distance) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                });
                let guide = documents
                    .iter()
                    .take(GUIDE_DOCUMENTS_USED)
                    .map(|d| d.content.trim())
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                if guide.is_empty() {
                    None
                } else {
                    info!("✓ 检索到教学指南 {} 条", documents.len());
                    Some(guide)
                }
            }
            Err(e) => {
                warn!("⚠️ 教学指南检索失败，继续出题: {}", e);
                None
            }
        }
    }
}
