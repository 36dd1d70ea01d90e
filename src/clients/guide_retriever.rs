//! 教学指南检索
//!
//! 向量库只作为外部能力出现："给一段文本，返回按相似度排序的文档"。
//! 索引的构建和嵌入策略不在本 crate 内。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// 检索到的一段指南文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideDocument {
    pub content: String,
    /// 距离越小越相似
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// 外部相似度检索能力
#[async_trait]
pub trait GuideRetriever: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<GuideDocument>>;
}
