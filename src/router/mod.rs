//! 问题路由
//!
//! 关键词判断是否需要天气数据 → LLM 抽取城市 → 查询天气 → 带数据的 LLM 回答。
//! 非天气问题直接交给通用助手回答。
//!
//! ```text
//! needs_weather?
//!   ├─ no  → LLM(通用助手)                         → 文本
//!   └─ yes → CityExtractor
//!              ├─ NONE → CLARIFICATION_MESSAGE
//!              └─ city → WeatherService
//!                          ├─ 失败 → 错误提示文本
//!                          └─ 快照 → LLM(天气助手 + 数据块) → 文本
//! ```

pub mod extractor;
pub mod intent;
pub mod prompt;

pub use extractor::{CityExtractor, NO_CITY, sanitize_city};
pub use intent::{WEATHER_KEYWORDS, needs_weather};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::llm::types::Message;
use crate::router::prompt::{
    CLARIFICATION_MESSAGE, GENERAL_SYSTEM_PROMPT, WEATHER_SYSTEM_PROMPT, weather_question_prompt,
    weather_summary,
};
use crate::weather::{WeatherOutcome, WeatherService};
use std::sync::Arc;
use tracing::{Instrument, info, warn};
use uuid::Uuid;

/// 分类 + 城市抽取的结果
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    /// 与天气无关，直接回答
    Direct { question: String },
    /// 需要天气数据，且已抽取到城市
    Weather { question: String, city: String },
    /// 需要天气数据，但问题中没有可用的城市
    MissingCity { question: String },
}

impl RoutingDecision {
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::Direct { .. } => "direct",
            RoutingDecision::Weather { .. } => "weather",
            RoutingDecision::MissingCity { .. } => "missing_city",
        }
    }
}

/// 顶层问答入口
///
/// 每个问题内部严格串行执行，不重试；LLM 调用失败直接以 `Err` 返回给调用方。
/// 路由器本身不持有可变状态，可在多个并发问题之间共享。
pub struct QueryRouter {
    llm: Arc<dyn LlmClient>,
    extractor: CityExtractor,
    weather: WeatherService,
    /// `daily` 数组中被当作"明天"的下标
    day_offset: usize,
}

impl QueryRouter {
    pub fn new(llm: Arc<dyn LlmClient>, weather: WeatherService) -> Self {
        Self {
            extractor: CityExtractor::new(llm.clone()),
            llm,
            weather,
            day_offset: 0,
        }
    }

    pub fn with_day_offset(mut self, day_offset: usize) -> Self {
        self.day_offset = day_offset;
        self
    }

    /// 回答一个问题
    pub async fn answer(&self, question: &str) -> Result<String> {
        let query_id = Uuid::new_v4();
        let span = tracing::info_span!("query", %query_id);

        async {
            let decision = self.decide(question).await?;
            info!(route = decision.kind(), "问题路由完成");
            self.respond(decision).await
        }
        .instrument(span)
        .await
    }

    /// 意图识别 + 城市抽取（天气问题会发起一次 LLM 调用）
    pub async fn decide(&self, question: &str) -> Result<RoutingDecision> {
        let question = question.to_string();
        if !needs_weather(&question) {
            return Ok(RoutingDecision::Direct { question });
        }

        Ok(match self.extractor.extract(&question).await? {
            Some(city) => RoutingDecision::Weather { question, city },
            None => RoutingDecision::MissingCity { question },
        })
    }

    /// 根据路由结果生成最终回复
    pub async fn respond(&self, decision: RoutingDecision) -> Result<String> {
        match decision {
            RoutingDecision::Direct { question } => {
                self.llm
                    .chat_simple(vec![
                        Message::system(GENERAL_SYSTEM_PROMPT.to_string()),
                        Message::user(question),
                    ])
                    .await
            }
            RoutingDecision::MissingCity { .. } => Ok(CLARIFICATION_MESSAGE.to_string()),
            RoutingDecision::Weather { question, city } => {
                self.answer_with_weather(&question, &city).await
            }
        }
    }

    async fn answer_with_weather(&self, question: &str, city: &str) -> Result<String> {
        let snapshot = match self.weather.get_weather(city).await? {
            WeatherOutcome::Ok { snapshot, .. } => snapshot,
            failure => {
                let message = failure.error_message().unwrap_or_default();
                warn!("天气数据获取失败: {}", message);
                return Ok(message);
            }
        };

        let summary = weather_summary(city, &snapshot, self.day_offset)?;
        self.llm
            .chat_simple(vec![
                Message::system(WEATHER_SYSTEM_PROMPT.to_string()),
                Message::user(weather_question_prompt(city, &summary, question)),
            ])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssistantError, LlmError, WeatherError};
    use crate::testing::{
        MockForecastProvider, MockGeocoder, MockLlmClient, sample_location, sample_snapshot,
    };

    struct Fixture {
        llm: Arc<MockLlmClient>,
        geocoder: Arc<MockGeocoder>,
        forecast: Arc<MockForecastProvider>,
        router: QueryRouter,
    }

    fn fixture(llm: MockLlmClient, geocoder: MockGeocoder, forecast: MockForecastProvider) -> Fixture {
        let llm = Arc::new(llm);
        let geocoder = Arc::new(geocoder);
        let forecast = Arc::new(forecast);
        let weather = WeatherService::new(geocoder.clone(), forecast.clone());
        Fixture {
            router: QueryRouter::new(llm.clone(), weather),
            llm,
            geocoder,
            forecast,
        }
    }

    fn paris_fixture(llm: MockLlmClient) -> Fixture {
        fixture(
            llm,
            MockGeocoder::new().with_city(sample_location("Paris")),
            MockForecastProvider::new().with_snapshot(sample_snapshot()),
        )
    }

    #[tokio::test]
    async fn test_general_question_single_llm_call() {
        let f = fixture(
            MockLlmClient::new().with_response("The capital of France is Paris."),
            MockGeocoder::new(),
            MockForecastProvider::new(),
        );

        let answer = f.router.answer("What is the capital of France?").await.unwrap();

        assert_eq!(answer, "The capital of France is Paris.");
        assert_eq!(f.llm.call_count(), 1);
        let messages = f.llm.last_messages().unwrap();
        assert_eq!(messages[0].content.as_deref(), Some(GENERAL_SYSTEM_PROMPT));
        assert_eq!(
            messages[1].content.as_deref(),
            Some("What is the capital of France?")
        );
        assert_eq!(f.geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_city_asks_for_clarification() {
        let f = paris_fixture(MockLlmClient::new().with_response("NONE"));

        let answer = f.router.answer("What's the weather in Seattle?").await.unwrap();

        assert_eq!(answer, CLARIFICATION_MESSAGE);
        assert_eq!(f.llm.call_count(), 1);
        assert_eq!(f.geocoder.call_count(), 0);
        assert_eq!(f.forecast.call_count(), 0);
    }

    #[tokio::test]
    async fn test_weather_question_grounded_answer() {
        let f = paris_fixture(
            MockLlmClient::new().with_responses(["Paris", "It's overcast and 17.3°C in Paris."]),
        );

        let answer = f.router.answer("Will it rain in Paris tomorrow?").await.unwrap();

        assert_eq!(answer, "It's overcast and 17.3°C in Paris.");
        assert_eq!(f.llm.call_count(), 2);
        assert_eq!(f.geocoder.calls(), vec!["Paris".to_string()]);
        assert_eq!(f.forecast.call_count(), 1);

        let messages = f.llm.last_messages().unwrap();
        assert_eq!(messages[0].content.as_deref(), Some(WEATHER_SYSTEM_PROMPT));
        let expected_summary = weather_summary("Paris", &sample_snapshot(), 0).unwrap();
        assert_eq!(
            messages[1].content.as_deref(),
            Some(
                weather_question_prompt("Paris", &expected_summary, "Will it rain in Paris tomorrow?")
                    .as_str()
            )
        );
    }

    #[tokio::test]
    async fn test_unknown_city_short_circuits() {
        let f = paris_fixture(MockLlmClient::new().with_response("Atlantis"));

        let answer = f.router.answer("Is it sunny in Atlantis?").await.unwrap();

        assert_eq!(answer, "Error: Could not find coordinates for Atlantis");
        assert_eq!(f.llm.call_count(), 1);
        assert_eq!(f.forecast.call_count(), 0);
    }

    #[tokio::test]
    async fn test_forecast_failure_short_circuits() {
        let f = fixture(
            MockLlmClient::new().with_response("Paris"),
            MockGeocoder::new().with_city(sample_location("Paris")),
            MockForecastProvider::new().with_request_failure("connection reset"),
        );

        let answer = f.router.answer("Is it cold in Paris?").await.unwrap();

        assert_eq!(answer, "Error fetching weather data: connection reset");
        assert_eq!(f.llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_untrusted_extractor_output_treated_as_missing() {
        let f = paris_fixture(MockLlmClient::new().with_response("San Francisco, Las Vegas"));

        let decision = f
            .router
            .decide("Compare the weather in San Francisco and Las Vegas")
            .await
            .unwrap();

        assert_eq!(decision.kind(), "missing_city");
        assert_eq!(f.geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_decide_variants() {
        let f = paris_fixture(MockLlmClient::new().with_response("\"Paris\""));

        let direct = f.router.decide("Who wrote Hamlet?").await.unwrap();
        assert_eq!(
            direct,
            RoutingDecision::Direct {
                question: "Who wrote Hamlet?".to_string()
            }
        );
        assert_eq!(f.llm.call_count(), 0);

        let weather = f.router.decide("Is it windy in Paris?").await.unwrap();
        assert_eq!(
            weather,
            RoutingDecision::Weather {
                question: "Is it windy in Paris?".to_string(),
                city: "Paris".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_day_offset_selects_forecast_day() {
        let f = paris_fixture(MockLlmClient::new().with_responses(["Paris", "ok"]));
        let router = f.router.with_day_offset(1);

        router.answer("Will it rain in Paris?").await.unwrap();

        let prompt = f.llm.last_user_prompt().unwrap();
        assert!(prompt.contains("Forecast for tomorrow (2026-10-20):"));
        assert!(prompt.contains("Chance of precipitation: 65%"));
    }

    #[tokio::test]
    async fn test_malformed_weather_data_is_a_fault() {
        let f = fixture(
            MockLlmClient::new().with_response("Paris"),
            MockGeocoder::new().with_city(sample_location("Paris")),
            MockForecastProvider::new()
                .with_error(WeatherError::MalformedResponse("missing current".to_string())),
        );

        let err = f.router.answer("Weather in Paris?").await.unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Weather(WeatherError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let f = fixture(
            MockLlmClient::new().with_network_error("connection refused"),
            MockGeocoder::new(),
            MockForecastProvider::new(),
        );

        let err = f.router.answer("When did World War II end?").await.unwrap_err();
        assert!(matches!(err, AssistantError::Llm(LlmError::NetworkError(_))));
    }
}
