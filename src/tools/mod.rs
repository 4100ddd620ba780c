//! 工具系统
//!
//! 定义 [`Tool`] trait 和 [`ToolManager`]（注册、查找、并发限流）。
//! 对外暴露的两个入口：[`GetWeatherTool`]（`get-weather`）和 [`ProcessQueryTool`]（`process-query`）。

pub mod query;
pub mod weather;

pub use query::ProcessQueryTool;
pub use weather::GetWeatherTool;

use crate::error::{AssistantError, Result, ToolError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// 工具执行结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

/// 工具执行配置
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionConfig {
    /// 同时执行的最大工具调用数。`None` = 不限制
    pub max_concurrency: Option<usize>,
}

impl ToolResult {
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error),
        }
    }
}

pub type ToolParameters = HashMap<String, serde_json::Value>;

/// 读取必填的字符串参数
pub fn required_str<'a>(parameters: &'a ToolParameters, name: &str) -> Result<&'a str> {
    match parameters.get(name) {
        None | Some(serde_json::Value::Null) => {
            Err(ToolError::MissingParameter(name.to_string()).into())
        }
        Some(value) => value.as_str().ok_or_else(|| {
            ToolError::InvalidParameter {
                name: name.to_string(),
                message: "expected a string".to_string(),
            }
            .into()
        }),
    }
}

/// 工具接口
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// 工具参数的 JSON Schema 定义
    fn parameters(&self) -> serde_json::Value;
    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult>;
}

pub struct ToolManager {
    /// 按名称排序，`tools/list` 输出稳定
    tools: BTreeMap<String, Box<dyn Tool>>,
    config: ToolExecutionConfig,
    /// 并发限流器：`Some(sem)` 表示最多同时执行 N 个工具；`None` = 不限制
    semaphore: Option<Arc<Semaphore>>,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::new_with_config(ToolExecutionConfig::default())
    }

    pub fn new_with_config(config: ToolExecutionConfig) -> Self {
        let semaphore = config
            .max_concurrency
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        Self {
            tools: BTreeMap::new(),
            semaphore,
            config,
        }
    }

    /// 返回并发度限制（`None` = 不限制）
    pub fn max_concurrency(&self) -> Option<usize> {
        self.config.max_concurrency
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|name| name.as_str()).collect()
    }

    pub fn get_tool(&self, tool_name: &str) -> Option<&dyn Tool> {
        self.tools.get(tool_name).map(|tool| &**tool)
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.values().map(|tool| &**tool)
    }

    /// 执行工具（不重试、不设超时）
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: ToolParameters,
    ) -> Result<ToolResult> {
        let tool = self
            .get_tool(tool_name)
            .ok_or_else(|| ToolError::NotFound(tool_name.to_string()))?;

        let _permit = match &self.semaphore {
            Some(sem) => Some(
                sem.acquire()
                    .await
                    .map_err(|e| AssistantError::Other(format!("工具限流器已关闭: {}", e)))?,
            ),
            None => None,
        };

        debug!("执行工具 '{}'", tool_name);
        tool.execute(parameters).await
    }
}
