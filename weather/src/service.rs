// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  client::{QWeatherApi, QWeatherClient},
  config::WeatherConfig,
  constants::*,
  decode::{decode_geo, decode_weather},
  models::weather::{GeoLocation, Query, SmartWeather, WeatherSnapshot},
};
use base::Context;
use error::Error;
use tracing::{debug, info, instrument};

pub struct WeatherService<A = QWeatherClient> {
  api: A,
}

impl WeatherService<QWeatherClient> {
  pub fn from_config(config: WeatherConfig) -> Result<Self, Error> {
    Ok(Self::new(QWeatherClient::new(config)?))
  }
}

impl<A: QWeatherApi> WeatherService<A> {
  pub fn new(api: A) -> Self {
    Self { api }
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  /// Current weather for a literal `lon,lat` string.
  #[instrument(skip(self, ctx))]
  pub async fn fetch_weather_by_coordinate(
    &self,
    ctx: &Context,
    location: &str,
  ) -> Result<WeatherSnapshot, Error> {
    let body = self
      .api
      .call(ctx, WEATHER_NOW_PATH, &[(LOCATION_PARAM, location)])
      .await?;
    decode_weather(&body)
  }

  /// Top geocoding match for a place name.
  #[instrument(skip(self, ctx))]
  pub async fn fetch_geo_by_city(&self, ctx: &Context, city: &str) -> Result<GeoLocation, Error> {
    self
      .lookup(ctx, city)
      .await?
      .into_iter()
      .next()
      .ok_or_else(|| Error::NotFound(city.to_string()))
  }

  /// Accepts either a place name or a `lon,lat` pair and returns the current
  /// weather, tagged with the original query.
  #[instrument(skip(self, ctx))]
  pub async fn resolve_and_fetch(&self, ctx: &Context, query: &str) -> Result<SmartWeather, Error> {
    let coordinates = match Query::classify(query) {
      Query::Coordinates(coordinates) => {
        debug!("Treating '{}' as coordinates", coordinates);
        coordinates.to_string()
      }
      Query::Place(place) => {
        let locations = self
          .lookup(ctx, place)
          .await
          .map_err(|e| e.context(format!("resolving location for {}", query)))?;

        // Ambiguous names resolve to the provider's top match.
        let location = locations
          .into_iter()
          .next()
          .ok_or_else(|| Error::NotFound(query.to_string()))?;

        let coordinates = location.coordinate().to_string();
        info!(
          "Resolved '{}' to {} ({}, {})",
          query, coordinates, location.adm2, location.adm1
        );
        coordinates
      }
    };

    let weather = self
      .fetch_weather_by_coordinate(ctx, &coordinates)
      .await
      .map_err(|e| e.context(format!("fetching weather for coordinates {}", coordinates)))?;

    Ok(SmartWeather {
      query: query.to_string(),
      coordinates,
      weather,
    })
  }

  async fn lookup(&self, ctx: &Context, name: &str) -> Result<Vec<GeoLocation>, Error> {
    let body = self
      .api
      .call(ctx, GEO_LOOKUP_PATH, &[(LOCATION_PARAM, name)])
      .await?;
    decode_geo(&body)
  }
}
