//! 测试基础设施
//!
//! 提供在不依赖真实 LLM / 天气服务的情况下测试各组件的工具集。
//!
//! | 类型 | 用途 |
//! |------|------|
//! | [`MockLlmClient`] | 替代真实 LLM，用于测试城市抽取和问题路由 |
//! | [`MockGeocoder`] | 替代 Open-Meteo 地理编码 |
//! | [`MockForecastProvider`] | 替代 Open-Meteo 天气预报 |
//!
//! # 设计原则
//!
//! - **零网络请求**：所有 Mock 都完全在内存中运行
//! - **可脚本化**：通过 `with_response()` / `with_city()` / `with_snapshot()` 精确控制返回值
//! - **可观测**：通过 `call_count()` / `last_user_prompt()` 等方法检查调用情况
//!
//! # 使用示例
//!
//! ```rust
//! use weather_assistant::router::QueryRouter;
//! use weather_assistant::testing::{
//!     MockForecastProvider, MockGeocoder, MockLlmClient, sample_location, sample_snapshot,
//! };
//! use weather_assistant::weather::WeatherService;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> weather_assistant::error::Result<()> {
//! let llm = Arc::new(
//!     MockLlmClient::new()
//!         .with_response("Paris")
//!         .with_response("Expect clouds and about 17°C in Paris."),
//! );
//! let weather = WeatherService::new(
//!     Arc::new(MockGeocoder::new().with_city(sample_location("Paris"))),
//!     Arc::new(MockForecastProvider::new().with_snapshot(sample_snapshot())),
//! );
//!
//! let router = QueryRouter::new(llm.clone(), weather);
//! let answer = router.answer("What's the weather in Paris?").await?;
//! assert_eq!(answer, "Expect clouds and about 17°C in Paris.");
//! assert_eq!(llm.call_count(), 2);
//! # Ok(())
//! # }
//! ```

mod mock_llm;
mod mock_weather;

pub use mock_llm::MockLlmClient;
pub use mock_weather::{MockForecastProvider, MockGeocoder, sample_location, sample_snapshot};
