// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherNowResponse {
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub now: NowPayload,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NowPayload {
  pub obs_time: String,
  pub temp: String,
  pub feels_like: String,
  pub icon: String,
  pub text: String,
  pub wind360: String,
  pub wind_dir: String,
  pub wind_scale: String,
  pub wind_speed: String,
  pub humidity: String,
  pub precip: String,
  pub pressure: String,
  pub vis: String,
  pub cloud: Option<String>,
  pub dew: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeoLookupResponse {
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub location: Vec<LocationPayload>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LocationPayload {
  pub name: String,
  pub id: String,
  pub lat: String,
  pub lon: String,
  pub adm1: String,
  pub adm2: String,
}
