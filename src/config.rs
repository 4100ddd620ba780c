//! 应用配置
//!
//! YAML 文件中每一节都可省略，缺省值即可直接连接本地 Ollama 与 Open-Meteo：
//! ```yaml
//! llm:
//!   model: llama3.2:3b
//!   baseurl: http://localhost:11434/v1/chat/completions
//! weather:
//!   geocoding_url: https://geocoding-api.open-meteo.com/v1/search
//!   forecast_url: https://api.open-meteo.com/v1/forecast
//! router:
//!   day_offset: 0
//! server:
//!   name: weather-assistant
//!   max_concurrency: 4
//! ```

use crate::error::{ConfigError, Result};
use crate::llm::config::ModelConfig;
use crate::weather::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// 作为“明天”使用的 daily 下标
    pub day_offset: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    /// 同时执行的工具调用上限，`None` = 不限制
    pub max_concurrency: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "weather-assistant".to_string(),
            max_concurrency: Some(4),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub llm: ModelConfig,
    pub weather: WeatherConfig,
    pub router: RouterConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let config: AppConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// 有路径则读文件，否则用默认值；随后应用环境变量覆盖
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|k| std::env::var(k).ok())?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.llm.apply_env(&lookup);

        if let Some(raw) = lookup("ASSISTANT_DAY_OFFSET") {
            self.router.day_offset =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        field: "router.day_offset".to_string(),
                        message: format!("'{}': {}", raw, e),
                    })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistantError;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "llm:\n  model: qwen2.5:7b\nrouter:\n  day_offset: 1\nserver:\n  max_concurrency: 8"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.llm.model, "qwen2.5:7b");
        assert_eq!(config.llm.baseurl, ModelConfig::default().baseurl);
        assert_eq!(config.router.day_offset, 1);
        assert_eq!(config.server.max_concurrency, Some(8));
        assert_eq!(config.server.name, "weather-assistant");
        assert_eq!(config.weather, WeatherConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "router:\n  day_offset: tomorrow").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Config(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ASSISTANT_LLM_MODEL", "mistral"),
            ("ASSISTANT_DAY_OFFSET", " 1 "),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.router.day_offset, 1);
    }

    #[test]
    fn test_invalid_day_offset() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|k| (k == "ASSISTANT_DAY_OFFSET").then(|| "-1".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
