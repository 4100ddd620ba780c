//! LLM 配置
//!
//! 默认指向本地 Ollama 的 OpenAI 兼容接口，可被环境变量覆盖：
//! ```text
//! ASSISTANT_LLM_MODEL=llama3.2:3b
//! ASSISTANT_LLM_BASEURL=http://localhost:11434/v1/chat/completions
//! ASSISTANT_LLM_APIKEY=sk-...
//! ```

use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "ASSISTANT_LLM_";

/// 单个模型的连接配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// LLM 接口中使用的模型名（如 `llama3.2:3b`）
    pub model: String,
    /// Chat Completions 接口完整 URL
    pub baseurl: String,
    /// 为空时不发送 Authorization 头（本地 Ollama 不需要）
    pub apikey: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2:3b".to_string(),
            baseurl: "http://localhost:11434/v1/chat/completions".to_string(),
            apikey: String::new(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ModelConfig {
    /// 用环境变量覆盖配置项。`lookup` 通常为 `|k| std::env::var(k).ok()`。
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{}{}", ENV_PREFIX, suffix));

        if let Some(model) = var("MODEL") {
            self.model = model;
        }
        if let Some(baseurl) = var("BASEURL") {
            self.baseurl = baseurl;
        }
        if let Some(apikey) = var("APIKEY") {
            self.apikey = apikey;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_only_present_keys() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ASSISTANT_LLM_MODEL", "qwen3-max"),
            ("ASSISTANT_LLM_APIKEY", "sk-test"),
        ]);

        let mut config = ModelConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.model, "qwen3-max");
        assert_eq!(config.apikey, "sk-test");
        assert_eq!(config.baseurl, ModelConfig::default().baseurl);
    }
}
