// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod client;
pub mod config;
pub mod decode;
pub mod format;
pub mod models;
pub mod service;

pub use client::{QWeatherApi, QWeatherClient};
pub use config::WeatherConfig;
pub use models::weather::{Coordinate, GeoLocation, Query, SmartWeather, WeatherSnapshot};
pub use service::WeatherService;

pub mod constants {
  use std::time::Duration;
  pub const WEATHER_NOW_PATH: &str = "/v7/weather/now";
  pub const GEO_LOOKUP_PATH: &str = "/geo/v2/city/lookup";
  pub const LOCATION_PARAM: &str = "location";
  pub(crate) const API_KEY_PARAM: &str = "key";
  pub(crate) const SUCCESS_CODE: &str = "200";
  pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
}
