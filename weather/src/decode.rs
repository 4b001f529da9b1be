// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  constants::SUCCESS_CODE,
  models::{
    api::{GeoLookupResponse, WeatherNowResponse},
    weather::{GeoLocation, WeatherSnapshot},
  },
};
use error::Error;
use serde::de::DeserializeOwned;

pub fn decode_weather(body: &[u8]) -> Result<WeatherSnapshot, Error> {
  let response: WeatherNowResponse = parse("weather", body)?;
  check_code(&response.code, body)?;
  Ok(response.now.into())
}

/// An empty list is not an error here; callers decide what "not found" means.
pub fn decode_geo(body: &[u8]) -> Result<Vec<GeoLocation>, Error> {
  let response: GeoLookupResponse = parse("geo", body)?;
  check_code(&response.code, body)?;
  Ok(response.location.into_iter().map(GeoLocation::from).collect())
}

fn parse<T: DeserializeOwned>(what: &'static str, body: &[u8]) -> Result<T, Error> {
  serde_json::from_slice(body).map_err(|source| Error::Decode {
    what,
    body: String::from_utf8_lossy(body).into_owned(),
    source,
  })
}

fn check_code(code: &str, body: &[u8]) -> Result<(), Error> {
  if code == SUCCESS_CODE {
    return Ok(());
  }
  Err(Error::Provider {
    code: code.to_string(),
    body: String::from_utf8_lossy(body).into_owned(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const NOW: &str = r#"{
    "code": "200",
    "updateTime": "2020-06-30T22:00+08:00",
    "now": {
      "obsTime": "2020-06-30T21:40+08:00",
      "temp": "24",
      "feelsLike": "26",
      "icon": "101",
      "text": "Cloudy",
      "wind360": "123",
      "windDir": "SE",
      "windScale": "1",
      "windSpeed": "3",
      "humidity": "72",
      "precip": "0.0",
      "pressure": "1003",
      "vis": "16",
      "cloud": "10",
      "dew": "21"
    }
  }"#;

  #[test]
  fn weather_fields_are_kept_verbatim() {
    let snapshot = decode_weather(NOW.as_bytes()).unwrap();
    assert_eq!(snapshot.obs_time, "2020-06-30T21:40+08:00");
    assert_eq!(snapshot.precip, "0.0");
    assert_eq!(snapshot.wind_360, "123");
    assert_eq!(snapshot.wind_dir, "SE");
    assert_eq!(snapshot.cloud, "10");
  }

  #[test]
  fn missing_or_null_optional_fields_become_empty() {
    let body = br#"{"code":"200","now":{"temp":"5","cloud":null}}"#;
    let snapshot = decode_weather(body).unwrap();
    assert_eq!(snapshot.temp, "5");
    assert_eq!(snapshot.cloud, "");
    assert_eq!(snapshot.dew, "");
    assert_eq!(snapshot.vis, "");
  }

  #[test]
  fn business_code_is_checked_after_parsing() {
    let body = br#"{"code":"401"}"#;
    let err = decode_weather(body).unwrap_err();
    assert!(matches!(&err, Error::Provider { code, .. } if code == "401"));
    assert_eq!(err.raw_body(), Some(r#"{"code":"401"}"#));

    let err = decode_geo(br#"{"location":[]}"#).unwrap_err();
    assert!(matches!(&err, Error::Provider { code, .. } if code.is_empty()));
  }

  #[test]
  fn malformed_json_keeps_the_body() {
    let err = decode_geo(b"<html>bad gateway</html>").unwrap_err();
    assert!(matches!(&err, Error::Decode { what: "geo", .. }));
    assert_eq!(err.raw_body(), Some("<html>bad gateway</html>"));
  }

  #[test]
  fn empty_geo_list_is_not_an_error() {
    assert!(decode_geo(br#"{"code":"200","location":[]}"#)
      .unwrap()
      .is_empty());
    assert!(decode_geo(br#"{"code":"200"}"#).unwrap().is_empty());
  }

  #[test]
  fn geo_entries_keep_provider_order() {
    let body = br#"{"code":"200","location":[
      {"name":"Beijing","id":"101010100","lat":"39.90499","lon":"116.40529","adm2":"Beijing","adm1":"Beijing"},
      {"name":"Beijing West","id":"101010200","lat":"1","lon":"2","adm2":"","adm1":""}
    ]}"#;
    let locations = decode_geo(body).unwrap();
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].id, "101010100");
    assert_eq!(locations[0].lon, "116.40529");
  }
}
