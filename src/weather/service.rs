use crate::error::{AssistantError, Result, WeatherError};
use crate::weather::forecast::{ForecastProvider, OpenMeteoForecast};
use crate::weather::geocoding::{Geocoder, OpenMeteoGeocoder};
use crate::weather::types::WeatherOutcome;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// 天气查询编排器：地理编码 → 天气预报
///
/// 两次请求严格串行（预报需要坐标），不重试。
/// 找不到城市、预报请求失败作为 [`WeatherOutcome`] 的分支返回；
/// 只有 `MalformedResponse` 这类意外情况才以 `Err` 传播。
#[derive(Clone)]
pub struct WeatherService {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastProvider>,
}

impl WeatherService {
    pub fn new(geocoder: Arc<dyn Geocoder>, forecast: Arc<dyn ForecastProvider>) -> Self {
        Self { geocoder, forecast }
    }

    /// 基于 Open-Meteo 的默认实现
    pub fn open_meteo(client: Arc<Client>, geocoding_url: &str, forecast_url: &str) -> Self {
        Self::new(
            Arc::new(OpenMeteoGeocoder::new(client.clone(), geocoding_url)),
            Arc::new(OpenMeteoForecast::new(client, forecast_url)),
        )
    }

    pub async fn get_weather(&self, city: &str) -> Result<WeatherOutcome> {
        let location = match self.geocoder.resolve(city).await {
            Ok(location) => location,
            Err(AssistantError::Weather(WeatherError::CityNotFound(_))) => {
                info!("找不到城市 '{}'，跳过天气预报请求", city);
                return Ok(WeatherOutcome::CityNotFound {
                    city: city.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let snapshot = match self.forecast.fetch(location.coordinates()).await {
            Ok(snapshot) => snapshot,
            Err(AssistantError::Weather(WeatherError::RequestFailed(message))) => {
                return Ok(WeatherOutcome::RequestFailed { message });
            }
            Err(e) => return Err(e),
        };

        Ok(WeatherOutcome::Ok {
            city: city.to_string(),
            location,
            snapshot,
        })
    }
}
