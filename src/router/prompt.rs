//! 提示词与天气上下文块
//!
//! 所有文本都是输入的纯函数（不含时间戳或随机量），同一快照多次格式化结果逐字节一致。

use crate::error::{Result, WeatherError};
use crate::weather::{WeatherSnapshot, describe};

pub const GENERAL_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that can answer various questions.";

pub const WEATHER_SYSTEM_PROMPT: &str = "You are a helpful weather assistant that provides accurate weather information based on real data.";

/// 天气问题中找不到城市时的固定回复
pub const CLARIFICATION_MESSAGE: &str = "I need a specific city to provide weather information. Could you please specify which city you're asking about?";

/// 生成注入给 LLM 的天气数据块。
///
/// `day_offset` 指定 `daily` 数组中被当作"明天"的下标；越界时返回 `MalformedResponse`。
pub fn weather_summary(city: &str, snapshot: &WeatherSnapshot, day_offset: usize) -> Result<String> {
    let current = &snapshot.current;
    let day = snapshot.daily.day(day_offset).ok_or_else(|| {
        WeatherError::MalformedResponse(format!(
            "daily forecast has {} day(s), day_offset {} is out of range",
            snapshot.daily.len(),
            day_offset
        ))
    })?;

    let heading = match &day.date {
        Some(date) => format!("Forecast for tomorrow ({}):", date),
        None => "Forecast for tomorrow:".to_string(),
    };
    let precipitation = match day.precipitation_probability {
        Some(p) => format!("{}%", p),
        None => "unknown".to_string(),
    };

    Ok(format!(
        "Current weather in {city}:\n\
         Temperature: {temperature}°C\n\
         Humidity: {humidity}%\n\
         Conditions: {conditions}\n\
         Wind Speed: {wind} km/h\n\
         \n\
         {heading}\n\
         High: {high}°C\n\
         Low: {low}°C\n\
         Conditions: {day_conditions}\n\
         Chance of precipitation: {precipitation}",
        city = city,
        temperature = current.temperature,
        humidity = current.humidity,
        conditions = describe(current.weather_code),
        wind = current.wind_speed,
        heading = heading,
        high = day.temperature_max,
        low = day.temperature_min,
        day_conditions = describe(day.weather_code),
        precipitation = precipitation,
    ))
}

/// 第二次 LLM 调用的用户消息：天气数据块 + 原始问题
pub fn weather_question_prompt(city: &str, summary: &str, question: &str) -> String {
    format!(
        "Based on the following real weather data for {}:\n\
         {}\n\n\
         Please answer this question: {}\n\n\
         Provide a natural, conversational response incorporating the actual weather data.",
        city, summary, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistantError;
    use crate::testing::sample_snapshot;

    #[test]
    fn test_summary_layout() {
        let summary = weather_summary("Paris", &sample_snapshot(), 0).unwrap();
        let expected = "Current weather in Paris:\n\
                        Temperature: 17.3°C\n\
                        Humidity: 64%\n\
                        Conditions: Overcast\n\
                        Wind Speed: 11.2 km/h\n\
                        \n\
                        Forecast for tomorrow (2026-10-19):\n\
                        High: 18.1°C\n\
                        Low: 9°C\n\
                        Conditions: Overcast\n\
                        Chance of precipitation: 20%";
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let snapshot = sample_snapshot();
        let first = weather_summary("Paris", &snapshot, 0).unwrap();
        let second = weather_summary("Paris", &snapshot, 0).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_summary_day_offset() {
        let summary = weather_summary("Paris", &sample_snapshot(), 1).unwrap();
        assert!(summary.contains("Forecast for tomorrow (2026-10-20):"));
        assert!(summary.contains("High: 16.4°C"));
        assert!(summary.contains("Conditions: Slight rain"));
        assert!(summary.contains("Chance of precipitation: 65%"));
    }

    #[test]
    fn test_summary_without_dates_or_precipitation() {
        let mut snapshot = sample_snapshot();
        snapshot.daily.time.clear();
        snapshot.daily.precipitation_probability_max = vec![None, None];

        let summary = weather_summary("Paris", &snapshot, 0).unwrap();
        assert!(summary.contains("\nForecast for tomorrow:\n"));
        assert!(summary.ends_with("Chance of precipitation: unknown"));
    }

    #[test]
    fn test_summary_offset_out_of_range() {
        let err = weather_summary("Paris", &sample_snapshot(), 7).unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Weather(WeatherError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_question_prompt_embeds_summary_and_question() {
        let prompt = weather_question_prompt("Paris", "SUMMARY", "Will it rain?");
        assert!(prompt.starts_with("Based on the following real weather data for Paris:\nSUMMARY\n"));
        assert!(prompt.contains("Please answer this question: Will it rain?"));
    }
}
