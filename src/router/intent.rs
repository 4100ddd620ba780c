//! 关键词意图识别：问题是否需要天气数据
//!
//! 纯子串匹配，不分词、不做词干还原。"hot topic" 这类误判和同义词漏判都是预期行为。

/// 天气相关关键词
pub const WEATHER_KEYWORDS: [&str; 25] = [
    "weather",
    "temperature",
    "rain",
    "snow",
    "sunny",
    "cloudy",
    "storm",
    "forecast",
    "humidity",
    "wind",
    "precipitation",
    "drizzle",
    "fog",
    "thunder",
    "hail",
    "breeze",
    "chilly",
    "warm",
    "cold",
    "hot",
    "degrees",
    "celsius",
    "fahrenheit",
    "°C",
    "°F",
];

/// 问题（忽略大小写）包含任一关键词即返回 `true`
pub fn needs_weather(question: &str) -> bool {
    let lowered = question.to_lowercase();
    WEATHER_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()))
}
