// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{SERVER_NAME, SERVER_VERSION};
use base::Context;
use error::Error;
use rmcp::{
  handler::server::{tool::ToolRouter, wrapper::Parameters},
  model::*,
  service::RequestContext,
  tool, tool_handler, tool_router, ErrorData, RoleServer, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use weather::{
  format::{format_geo, format_weather},
  QWeatherApi, WeatherService,
};

#[derive(Deserialize, JsonSchema)]
struct CurrentWeatherRequest {
  /// Coordinates as "longitude,latitude", e.g. 116.41,39.92
  location: String,
}

#[derive(Deserialize, JsonSchema)]
struct GeoRequest {
  /// City name, e.g. Beijing
  city: String,
}

#[derive(Deserialize, JsonSchema)]
struct SmartWeatherRequest {
  /// City name (e.g. Beijing) or coordinates (e.g. 116.41,39.92)
  query: String,
}

/// The QWeather tools. Cheap to clone; every clone shares one provider client.
#[derive(Clone)]
pub struct WeatherServer {
  service: Arc<WeatherService<Arc<dyn QWeatherApi>>>,
  tool_timeout: Option<Duration>,
  tool_router: ToolRouter<Self>,
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str, Error> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::Validation(format!("'{}' must not be empty", name)));
  }
  Ok(value)
}

fn into_result(tool: &str, outcome: Result<String, Error>) -> CallToolResult {
  match outcome {
    Ok(text) => CallToolResult::success(vec![Content::text(text)]),
    Err(e) => {
      warn!("{} failed: {}", tool, e);
      CallToolResult::error(vec![Content::text(e.to_string())])
    }
  }
}

#[tool_router]
impl WeatherServer {
  pub fn new(api: Arc<dyn QWeatherApi>, tool_timeout: Option<Duration>) -> Self {
    Self {
      service: Arc::new(WeatherService::new(api)),
      tool_timeout,
      tool_router: Self::tool_router(),
    }
  }

  #[tool(description = "Get the current weather for a coordinate pair")]
  async fn get_current_weather(
    &self,
    Parameters(req): Parameters<CurrentWeatherRequest>,
    ctx: RequestContext<RoleServer>,
  ) -> Result<CallToolResult, ErrorData> {
    let ctx = self.call_context(&ctx.ct);
    let outcome = self.current_weather(&ctx, &req.location).await;
    Ok(into_result("get_current_weather", outcome))
  }

  #[tool(description = "Look up a city and return its coordinates and location ID")]
  async fn get_geo(
    &self,
    Parameters(req): Parameters<GeoRequest>,
    ctx: RequestContext<RoleServer>,
  ) -> Result<CallToolResult, ErrorData> {
    let ctx = self.call_context(&ctx.ct);
    let outcome = self.geo(&ctx, &req.city).await;
    Ok(into_result("get_geo", outcome))
  }

  #[tool(description = "Get the current weather for a city name or a \"longitude,latitude\" pair")]
  async fn get_smart_weather(
    &self,
    Parameters(req): Parameters<SmartWeatherRequest>,
    ctx: RequestContext<RoleServer>,
  ) -> Result<CallToolResult, ErrorData> {
    let ctx = self.call_context(&ctx.ct);
    let outcome = self.smart_weather(&ctx, &req.query).await;
    Ok(into_result("get_smart_weather", outcome))
  }
}

impl WeatherServer {
  /// Cancelled with the request; bounded by the tool timeout when one is set.
  fn call_context(&self, request: &CancellationToken) -> Context {
    let ctx = Context::with_token(request.child_token());
    match self.tool_timeout {
      Some(timeout) => ctx.with_timeout(timeout),
      None => ctx,
    }
  }

  async fn current_weather(&self, ctx: &Context, location: &str) -> Result<String, Error> {
    let location = required("location", location)?;
    let weather = self
      .service
      .fetch_weather_by_coordinate(ctx, location)
      .await?;
    Ok(format_weather(&weather, None))
  }

  async fn geo(&self, ctx: &Context, city: &str) -> Result<String, Error> {
    let city = required("city", city)?;
    let location = self.service.fetch_geo_by_city(ctx, city).await?;
    Ok(format_geo(&location))
  }

  async fn smart_weather(&self, ctx: &Context, query: &str) -> Result<String, Error> {
    let query = required("query", query)?;
    let result = self.service.resolve_and_fetch(ctx, query).await?;
    info!("Resolved '{}' to {}", query, result.query);
    Ok(format_weather(&result.weather, Some(&result.query)))
  }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
  fn get_info(&self) -> ServerInfo {
    ServerInfo {
      capabilities: ServerCapabilities::builder().enable_tools().build(),
      server_info: Implementation {
        name: SERVER_NAME.to_string(),
        version: SERVER_VERSION.to_string(),
        ..Implementation::from_build_env()
      },
      instructions: Some(
        "Weather tools backed by QWeather. Use get_smart_weather for a city name or \
         \"longitude,latitude\" pair, get_geo to look up a city, and get_current_weather \
         when coordinates are already known."
          .into(),
      ),
      ..Default::default()
    }
  }
}
