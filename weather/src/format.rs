// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::models::weather::{GeoLocation, WeatherSnapshot};

/// Fixed text layout for a weather snapshot. `label` adds a leading location line.
pub fn format_weather(weather: &WeatherSnapshot, label: Option<&str>) -> String {
  let header = label
    .map(|label| format!("Location: {}\n", label))
    .unwrap_or_default();

  format!(
    "{}Observed at: {}\n\
    Weather: {}, temperature: {}°C (feels like {}°C)\n\
    Wind: {} scale {} ({} km/h)\n\
    Humidity: {}%, precipitation: {} mm, pressure: {} hPa\n\
    Visibility: {} km",
    header,
    weather.obs_time,
    weather.text,
    weather.temp,
    weather.feels_like,
    weather.wind_dir,
    weather.wind_scale,
    weather.wind_speed,
    weather.humidity,
    weather.precip,
    weather.pressure,
    weather.vis,
  )
}

pub fn format_geo(location: &GeoLocation) -> String {
  format!(
    "City: {} ({}, {}), longitude: {}, latitude: {}, ID: {}",
    location.name, location.adm2, location.adm1, location.lon, location.lat, location.id
  )
}
