//! 天气数据
//!
//! Open-Meteo 地理编码 + 天气预报客户端，以及把两者串起来的 [`WeatherService`]。

pub mod codes;
pub mod forecast;
pub mod geocoding;
mod service;
pub mod types;

pub use codes::describe;
pub use forecast::{DEFAULT_FORECAST_URL, ForecastProvider, OpenMeteoForecast};
pub use geocoding::{DEFAULT_GEOCODING_URL, Geocoder, OpenMeteoGeocoder};
pub use service::WeatherService;
pub use types::{
    Coordinates, CurrentConditions, DailyForecast, DayForecast, GeoResult, WeatherOutcome,
    WeatherSnapshot,
};
