use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 课程配置 ---
    /// 课程表文件路径（.json 或 .toml）
    pub curriculum_path: String,
    /// 出题时允许重试的次数（总调用次数 = 重试次数 + 1）
    pub max_generation_retries: usize,
    /// 提示词中最多列出的允许/禁止主题数
    pub prompt_topic_limit: usize,
    /// 教学指南检索返回的文档数
    pub guide_top_k: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 2048,
            curriculum_path: "resource/curriculum.json".to_string(),
            max_generation_retries: 2,
            prompt_topic_limit: 12,
            guide_top_k: 3,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            curriculum_path: std::env::var("CURRICULUM_PATH").unwrap_or(default.curriculum_path),
            max_generation_retries: std::env::var("MAX_GENERATION_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_generation_retries),
            prompt_topic_limit: std::env::var("PROMPT_TOPIC_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.prompt_topic_limit),
            guide_top_k: std::env::var("GUIDE_TOP_K").ok().and_then(|v| v.parse().ok()).unwrap_or(default.guide_top_k),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 检查真实 LLM 客户端所需的配置是否齐全
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        Ok(())
    }
}
