// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::REQUEST_TIMEOUT;
use config::QWeatherConfig;
use std::time::Duration;

#[derive(Clone)]
pub struct WeatherConfig {
  pub(crate) api_key: String,
  pub(crate) base_url: String,
  pub(crate) timeout: Duration,
}

impl WeatherConfig {
  pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      base_url: base_url.into(),
      timeout: REQUEST_TIMEOUT,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }
}

impl From<&QWeatherConfig> for WeatherConfig {
  fn from(config: &QWeatherConfig) -> Self {
    Self::new(config.api_key.clone(), config.base_url.clone()).with_timeout(config.timeout())
  }
}

impl std::fmt::Debug for WeatherConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WeatherConfig")
      .field("api_key", &"<redacted>")
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}
