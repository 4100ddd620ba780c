use crate::error::Result;
use crate::tools::{Tool, ToolParameters, ToolResult, required_str};
use crate::weather::WeatherService;
use serde_json::{Value, json};

/// `get-weather`：返回城市天气查询结果（`WeatherOutcome` 的 JSON 表示）
pub struct GetWeatherTool {
    weather: WeatherService,
}

impl GetWeatherTool {
    pub fn new(weather: WeatherService) -> Self {
        Self { weather }
    }
}

#[async_trait::async_trait]
impl Tool for GetWeatherTool {
    fn name(&self) -> &str {
        "get-weather"
    }

    fn description(&self) -> &str {
        "Get current weather and the daily forecast for a city."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g. \"Tokyo\""
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult> {
        let city = required_str(&parameters, "city")?;
        let outcome = self.weather.get_weather(city).await?;
        Ok(ToolResult::success(serde_json::to_string(&outcome)?))
    }
}
