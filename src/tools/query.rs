use crate::error::Result;
use crate::router::QueryRouter;
use crate::tools::{Tool, ToolParameters, ToolResult, required_str};
use serde_json::{Value, json};
use std::sync::Arc;

/// `process-query`：回答任意问题，天气问题会自动查询真实天气数据
pub struct ProcessQueryTool {
    router: Arc<QueryRouter>,
}

impl ProcessQueryTool {
    pub fn new(router: Arc<QueryRouter>) -> Self {
        Self { router }
    }
}

#[async_trait::async_trait]
impl Tool for ProcessQueryTool {
    fn name(&self) -> &str {
        "process-query"
    }

    fn description(&self) -> &str {
        "Answer a question; weather questions are answered with live weather data."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The user's question"
                }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult> {
        let question = required_str(&parameters, "question")?;
        let answer = self.router.answer(question).await?;
        Ok(ToolResult::success(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::prompt::CLARIFICATION_MESSAGE;
    use crate::testing::{MockForecastProvider, MockGeocoder, MockLlmClient};
    use crate::weather::WeatherService;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_process_query_returns_router_answer() {
        let llm = Arc::new(MockLlmClient::new().with_response("NONE"));
        let weather = WeatherService::new(
            Arc::new(MockGeocoder::new()),
            Arc::new(MockForecastProvider::new()),
        );
        let tool = ProcessQueryTool::new(Arc::new(QueryRouter::new(llm, weather)));

        let mut params = HashMap::new();
        params.insert("question".to_string(), json!("Is it going to snow?"));
        let result = tool.execute(params).await.unwrap();

        assert!(result.success);
        assert_eq!(result.output, CLARIFICATION_MESSAGE);
    }
}
