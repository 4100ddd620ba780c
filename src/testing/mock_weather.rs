//! 天气服务的 Mock 实现与测试数据

use crate::error::{Result, WeatherError};
use crate::weather::{
    Coordinates, CurrentConditions, DailyForecast, ForecastProvider, GeoResult, Geocoder,
    WeatherSnapshot,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// 按城市名精确匹配的 Mock 地理编码器，未登记的城市返回 `CityNotFound`
pub struct MockGeocoder {
    cities: HashMap<String, GeoResult>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            cities: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 登记一个可被解析的城市（以 `name` 字段为键）
    pub fn with_city(mut self, location: GeoResult) -> Self {
        self.cities.insert(location.name.clone(), location);
        self
    }

    /// 收到的查询城市名（按时序）
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn resolve(&self, city: &str) -> Result<GeoResult> {
        self.calls.lock().unwrap().push(city.to_string());
        self.cities
            .get(city)
            .cloned()
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()).into())
    }
}

/// 按顺序返回预设结果的 Mock 预报服务；队列耗尽后返回 `RequestFailed`
pub struct MockForecastProvider {
    responses: Arc<Mutex<VecDeque<std::result::Result<WeatherSnapshot, WeatherError>>>>,
    calls: Arc<Mutex<Vec<Coordinates>>>,
}

impl Default for MockForecastProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForecastProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_snapshot(self, snapshot: WeatherSnapshot) -> Self {
        self.responses.lock().unwrap().push_back(Ok(snapshot));
        self
    }

    pub fn with_request_failure(self, msg: impl Into<String>) -> Self {
        self.with_error(WeatherError::RequestFailed(msg.into()))
    }

    pub fn with_error(self, err: WeatherError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_coordinates(&self) -> Option<Coordinates> {
        self.calls.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl ForecastProvider for MockForecastProvider {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        self.calls.lock().unwrap().push(coords);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(e)) => Err(e.into()),
            None => Err(WeatherError::RequestFailed("no scripted forecast".to_string()).into()),
        }
    }
}

/// 测试用地理编码结果
pub fn sample_location(name: &str) -> GeoResult {
    GeoResult {
        name: name.to_string(),
        latitude: 48.85341,
        longitude: 2.3488,
        country: Some("France".to_string()),
        country_code: Some("FR".to_string()),
        admin1: Some("Île-de-France".to_string()),
        timezone: Some("Europe/Paris".to_string()),
        elevation: Some(42.0),
        population: Some(2_138_551),
    }
}

/// 固定的两天天气快照
pub fn sample_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        timezone: Some("Europe/Paris".to_string()),
        current: CurrentConditions {
            temperature: 17.3,
            humidity: 64.0,
            weather_code: 3,
            wind_speed: 11.2,
        },
        daily: DailyForecast {
            time: vec!["2026-10-19".to_string(), "2026-10-20".to_string()],
            temperature_max: vec![18.1, 16.4],
            temperature_min: vec![9.0, 8.2],
            precipitation_probability_max: vec![Some(20.0), Some(65.0)],
            weather_code: vec![3, 61],
        },
    }
}
