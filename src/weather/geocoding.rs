//! 城市名 → 经纬度（Open-Meteo Geocoding API，无需 API Key）

use crate::error::{Result, WeatherError};
use crate::weather::types::GeoResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// 地理编码接口
///
/// 找不到城市（无结果、请求失败或响应体不是 JSON）返回 [`WeatherError::CityNotFound`]，
/// 响应结构不符合预期返回 [`WeatherError::MalformedResponse`]。
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, city: &str) -> Result<GeoResult>;
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// 无匹配时上游直接省略该字段
    #[serde(default)]
    results: Vec<GeoResult>,
}

pub struct OpenMeteoGeocoder {
    client: Arc<Client>,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(client: Arc<Client>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, city: &str) -> Result<GeoResult> {
        let not_found = || WeatherError::CityNotFound(city.to_string());

        let response = match self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", city),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("地理编码请求失败 '{}': {}", city, e);
                return Err(not_found().into());
            }
        };

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("读取地理编码响应失败 '{}': {}", city, e);
                return Err(not_found().into());
            }
        };

        // 非 JSON 的响应体按请求失败处理；JSON 但结构不对才算 MalformedResponse
        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                warn!("地理编码响应不是 JSON '{}': {}", city, e);
                return Err(not_found().into());
            }
        };
        let parsed: GeocodingResponse = serde_json::from_value(value)
            .map_err(|e| WeatherError::MalformedResponse(format!("geocoding: {}", e)))?;

        let Some(first) = parsed.results.into_iter().next() else {
            debug!("地理编码无结果: '{}'", city);
            return Err(not_found().into());
        };

        debug!(
            "地理编码 '{}' -> {} ({}, {})",
            city, first.name, first.latitude, first.longitude
        );
        Ok(first)
    }
}
