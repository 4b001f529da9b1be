// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{config::WeatherConfig, constants::API_KEY_PARAM};
use async_trait::async_trait;
use base::Context;
use error::{Error, TransportError};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Authenticated GET against the provider, returning the raw body.
#[async_trait]
pub trait QWeatherApi: Send + Sync {
  async fn call(&self, ctx: &Context, path: &str, params: &[(&str, &str)])
    -> Result<Vec<u8>, Error>;
}

#[async_trait]
impl<T: QWeatherApi + ?Sized> QWeatherApi for Arc<T> {
  async fn call(
    &self,
    ctx: &Context,
    path: &str,
    params: &[(&str, &str)],
  ) -> Result<Vec<u8>, Error> {
    (**self).call(ctx, path, params).await
  }
}

#[derive(Debug, Clone)]
pub struct QWeatherClient {
  config: WeatherConfig,
  client: Client,
}

impl QWeatherClient {
  pub fn new(config: WeatherConfig) -> Result<Self, Error> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { config, client })
  }

  fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, Error> {
    let params = params
      .iter()
      .copied()
      .chain(std::iter::once((API_KEY_PARAM, self.config.api_key.as_str())));

    Url::parse_with_params(&format!("{}{}", self.config.base_url, path), params).map_err(|source| {
      TransportError::InvalidUrl {
        path: path.to_string(),
        source,
      }
      .into()
    })
  }

  async fn send(&self, path: &str, url: Url) -> Result<Vec<u8>, Error> {
    let network = |source| TransportError::Network {
      path: path.to_string(),
      source,
    };

    let response = self.client.get(url).send().await.map_err(network)?;
    let status = response.status();
    let body = response.bytes().await.map_err(network)?;

    if status != StatusCode::OK {
      warn!("Provider answered {} with status {}", path, status);
      return Err(
        TransportError::Status {
          path: path.to_string(),
          status: status.as_u16(),
          body: String::from_utf8_lossy(&body).into_owned(),
        }
        .into(),
      );
    }

    debug!("Received {} bytes from {}", body.len(), path);
    Ok(body.to_vec())
  }
}

#[async_trait]
impl QWeatherApi for QWeatherClient {
  #[instrument(skip(self, ctx, params))]
  async fn call(
    &self,
    ctx: &Context,
    path: &str,
    params: &[(&str, &str)],
  ) -> Result<Vec<u8>, Error> {
    let url = self.build_url(path, params)?;
    ctx.run(self.send(path, url)).await
  }
}
