#[cfg(test)]
pub mod fakes {
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::clients::{GuideDocument, GuideRetriever, TextGenerator};
    use crate::error::{AppError, AppResult};

    /// 按顺序返回预设回复的生成器，并记录每次调用的提示词
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<AppResult<String>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedGenerator {
        pub fn new(replies: Vec<AppResult<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        pub fn failing() -> Self {
            Self::new(vec![Err(AppError::llm_unavailable("scripted failure"))])
        }

        /// (system, user) 提示词
        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, system_prompt: &str, user_prompt: &str) -> AppResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::llm_unavailable("no scripted reply left")))
        }
    }

    /// 返回固定文档的检索器
    pub struct FixedRetriever {
        pub documents: Vec<String>,
        pub fail: bool,
    }

    #[async_trait]
    impl GuideRetriever for FixedRetriever {
        async fn search(&self, _query: &str, top_k: usize) -> AppResult<Vec<GuideDocument>> {
            if self.fail {
                return Err(AppError::Other("vector store offline".to_string()));
            }
            Ok(self
                .documents
                .iter()
                .take(top_k)
                .map(|content| GuideDocument {
                    content: content.clone(),
                    distance: None,
                })
                .collect())
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use crate::models::curriculum::{CurriculumRow, CurriculumTable};

    /// 1~2 学年的小课程表
    pub fn sample_curriculum() -> CurriculumTable {
        CurriculumTable::new(vec![
            CurriculumRow::new(1, 1, &["9까지의 수", "덧셈"]),
            CurriculumRow::new(1, 2, &["뺄셈"]),
            CurriculumRow::new(2, 1, &["곱셈", "분수와 소수"]),
        ])
    }

    /// 合规的两道题卷子
    pub const CLEAN_WORKSHEET: &str = "\
[Worksheet]
[Problem 1] 2 + 3 = ?
Choices: A) 4 B) 5 C) 6 D) 7
[Problem 2] 5 - 1 = ?
Choices: A) 3 B) 4 C) 5 D) 6
[AnswerKey]
1) B
2) B
";

    /// 含有禁止主题（곱셈）的卷子
    pub const BANNED_WORKSHEET: &str = "\
[Worksheet]
[Problem 1] 2 곱셈 3 = ?
Choices: A) 5 B) 6 C) 7 D) 8
[AnswerKey]
1) B
";
}
