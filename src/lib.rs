//! # Math Worksheet
//!
//! 按课程进度出题、评分的小学数学练习工具
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 外部能力层（Clients）
//! - `clients/` - 只暴露能力，由调用方构造并注入
//! - `TextGenerator` - 文本生成（OpenAI 兼容接口）
//! - `GuideRetriever` - 教学指南相似度检索
//!
//! ### ② 纯逻辑层（Models / Policy / Parser / Grading）
//! - `models/` - 课程表、题目、评分结果等数据类型
//! - `policy/` - 按学年学期划分允许/禁止主题，禁止词检查
//! - `parser/` - 卷子、答案、学生作答、解析文本的解析
//! - `grading/` - 确定性评分和四段式报告
//!
//! ### ③ 业务能力层（Services）
//! - `WorksheetService` - 出题 + 范围检查（带重试）
//! - `ExplanationService` - 逐题解析（失败兜底）
//!
//! ### ④ 流程层（Workflow）
//! - `LessonFlow` - 选题 → 检索 → 出题 → 解析
//! - `AssessmentFlow` - 解析 → 评分 → 解析文字 → 反馈
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod grading;
pub mod models;
pub mod parser;
pub mod policy;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_utils;

// 重新导出常用类型
pub use clients::{GuideDocument, GuideRetriever, OpenAiGenerator, TextGenerator};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CurriculumTable, ParsedWorksheet, ScoreReport, TopicPolicy};
pub use services::{ComplianceVerdict, GenerationOutcome};
pub use workflow::{AssessmentFlow, AssessmentResult, LessonFlow, LessonMaterials, LessonRequest};
