// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use super::api::{LocationPayload, NowPayload};
use error::Error;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Current conditions. Values are kept exactly as the provider formats them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherSnapshot {
  pub obs_time: String,
  pub temp: String,
  pub feels_like: String,
  pub icon: String,
  pub text: String,
  pub wind_360: String,
  pub wind_dir: String,
  pub wind_scale: String,
  pub wind_speed: String,
  pub humidity: String,
  pub precip: String,
  pub pressure: String,
  pub vis: String,
  pub cloud: String,
  pub dew: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoLocation {
  pub name: String,
  pub id: String,
  /// Province.
  pub adm1: String,
  /// City.
  pub adm2: String,
  pub lat: String,
  pub lon: String,
}

/// Longitude/latitude pair, written as `lon,lat` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
  pub lon: String,
  pub lat: String,
}

/// How a smart query is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
  /// Passed to the provider verbatim, no numeric validation.
  Coordinates(&'a str),
  Place(&'a str),
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartWeather {
  pub query: String,
  pub coordinates: String,
  pub weather: WeatherSnapshot,
}

impl From<NowPayload> for WeatherSnapshot {
  fn from(now: NowPayload) -> Self {
    Self {
      obs_time: now.obs_time,
      temp: now.temp,
      feels_like: now.feels_like,
      icon: now.icon,
      text: now.text,
      wind_360: now.wind360,
      wind_dir: now.wind_dir,
      wind_scale: now.wind_scale,
      wind_speed: now.wind_speed,
      humidity: now.humidity,
      precip: now.precip,
      pressure: now.pressure,
      vis: now.vis,
      cloud: now.cloud.unwrap_or_default(),
      dew: now.dew.unwrap_or_default(),
    }
  }
}

impl From<LocationPayload> for GeoLocation {
  fn from(location: LocationPayload) -> Self {
    Self {
      name: location.name,
      id: location.id,
      adm1: location.adm1,
      adm2: location.adm2,
      lat: location.lat,
      lon: location.lon,
    }
  }
}

impl GeoLocation {
  pub fn coordinate(&self) -> Coordinate {
    Coordinate {
      lon: self.lon.clone(),
      lat: self.lat.clone(),
    }
  }
}

impl fmt::Display for Coordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{}", self.lon, self.lat)
  }
}

impl FromStr for Coordinate {
  type Err = Error;

  /// Splits on the first comma. The halves are not checked for being numeric.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.split_once(',') {
      Some((lon, lat)) => Ok(Self {
        lon: lon.to_string(),
        lat: lat.to_string(),
      }),
      None => Err(Error::Validation(format!(
        "coordinates must be \"lon,lat\", got '{}'",
        s
      ))),
    }
  }
}

impl<'a> Query<'a> {
  pub fn classify(input: &'a str) -> Self {
    if input.contains(',') {
      Query::Coordinates(input)
    } else {
      Query::Place(input)
    }
  }
}
