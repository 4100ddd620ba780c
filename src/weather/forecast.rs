//! 经纬度 → 当前天气 + 逐日预报（Open-Meteo Forecast API）

use crate::error::{Result, WeatherError};
use crate::weather::types::{Coordinates, WeatherSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_probability_max,weather_code";

/// 天气预报接口
///
/// 网络 / HTTP 失败或响应体不是 JSON 返回 [`WeatherError::RequestFailed`]（附带上游信息），
/// 缺字段或逐日数组不一致返回 [`WeatherError::MalformedResponse`]。
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot>;
}

pub struct OpenMeteoForecast {
    client: Arc<Client>,
    base_url: String,
}

impl OpenMeteoForecast {
    pub fn new(client: Arc<Client>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoForecast {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        let params = [
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("天气预报请求失败 ({}, {}): {}", coords.latitude, coords.longitude, e);
                WeatherError::RequestFailed(e.to_string())
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| WeatherError::RequestFailed(format!("response is not JSON: {}", e)))?;
        let snapshot: WeatherSnapshot = serde_json::from_value(value)
            .map_err(|e| WeatherError::MalformedResponse(format!("forecast: {}", e)))?;
        snapshot.validate()?;

        debug!(
            "天气预报: {}°C, 共 {} 天",
            snapshot.current.temperature,
            snapshot.daily.len()
        );
        Ok(snapshot)
    }
}
