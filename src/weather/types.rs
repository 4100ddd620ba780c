//! 天气数据模型
//!
//! 字段名通过 serde 保持与 Open-Meteo 返回值一致（`temperature_2m` 等），
//! 因此 `get-weather` 工具输出的 JSON 与上游字典结构相同。

use crate::error::WeatherError;
use serde::{Deserialize, Serialize};

/// 经纬度坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// 地理编码结果（只保留第一条候选）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// 一级行政区（州 / 省）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

impl GeoResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// 当前天气
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// °C
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    /// 相对湿度 %
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: f64,
    /// WMO 天气代码
    pub weather_code: i32,
    /// km/h
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
}

/// 按天排列的预报数组（各数组下标一一对应）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<f64>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<f64>,
    /// 上游可能对个别日期返回 null
    pub precipitation_probability_max: Vec<Option<f64>>,
    pub weather_code: Vec<i32>,
}

/// 单日预报视图
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: Option<String>,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation_probability: Option<f64>,
    pub weather_code: i32,
}

impl DailyForecast {
    /// 预报天数
    pub fn len(&self) -> usize {
        self.temperature_max.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取第 `index` 天的预报，越界返回 `None`
    pub fn day(&self, index: usize) -> Option<DayForecast> {
        Some(DayForecast {
            date: self.time.get(index).cloned(),
            temperature_max: *self.temperature_max.get(index)?,
            temperature_min: *self.temperature_min.get(index)?,
            precipitation_probability: *self.precipitation_probability_max.get(index)?,
            weather_code: *self.weather_code.get(index)?,
        })
    }
}

/// 一次查询得到的天气快照：当前天气 + 逐日预报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub current: CurrentConditions,
    pub daily: DailyForecast,
}

impl WeatherSnapshot {
    /// 校验逐日数组非空且长度一致
    pub fn validate(&self) -> std::result::Result<(), WeatherError> {
        let daily = &self.daily;
        let days = daily.len();
        if days == 0 {
            return Err(WeatherError::MalformedResponse(
                "daily forecast is empty".to_string(),
            ));
        }

        let lengths = [
            ("temperature_2m_min", daily.temperature_min.len()),
            (
                "precipitation_probability_max",
                daily.precipitation_probability_max.len(),
            ),
            ("weather_code", daily.weather_code.len()),
        ];
        for (field, len) in lengths {
            if len != days {
                return Err(WeatherError::MalformedResponse(format!(
                    "daily.{} has {} entries, expected {}",
                    field, len, days
                )));
            }
        }
        if !daily.time.is_empty() && daily.time.len() != days {
            return Err(WeatherError::MalformedResponse(format!(
                "daily.time has {} entries, expected {}",
                daily.time.len(),
                days
            )));
        }
        Ok(())
    }
}

/// 天气编排器的结果：成功快照或预期内的失败原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherOutcome {
    Ok {
        city: String,
        location: GeoResult,
        snapshot: WeatherSnapshot,
    },
    CityNotFound {
        city: String,
    },
    RequestFailed {
        message: String,
    },
}

impl WeatherOutcome {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherOutcome::Ok { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// 失败分支面向用户的提示文本；成功时为 `None`
    pub fn error_message(&self) -> Option<String> {
        match self {
            WeatherOutcome::Ok { .. } => None,
            WeatherOutcome::CityNotFound { city } => {
                Some(format!("Error: Could not find coordinates for {}", city))
            }
            WeatherOutcome::RequestFailed { message } => {
                Some(format!("Error fetching weather data: {}", message))
            }
        }
    }
}
