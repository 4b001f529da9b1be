// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use rmcp::{
  model::{CallToolRequestParams, CallToolResult, ClientInfo},
  service::RunningService,
  ClientHandler, RoleClient, ServiceError, ServiceExt,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use weather::{QWeatherApi, QWeatherClient, WeatherConfig};
use weather_mcp::WeatherServer;
use wiremock::{
  matchers::{method, path, query_param},
  Mock, MockServer, ResponseTemplate,
};

const NOW: &str = r#"{"code":"200","now":{"obsTime":"2024-05-01T10:00+08:00","temp":"21","feelsLike":"20","icon":"100","text":"Sunny","wind360":"0","windDir":"N","windScale":"2","windSpeed":"9","humidity":"30","precip":"0.0","pressure":"1012","vis":"30"}}"#;
const GEO: &str = r#"{"code":"200","location":[{"name":"Beijing","id":"101010100","lat":"39.92","lon":"116.41","adm2":"Beijing","adm1":"Beijing"}]}"#;

#[derive(Debug, Clone, Default)]
struct TestClient;

impl ClientHandler for TestClient {
  fn get_info(&self) -> ClientInfo {
    ClientInfo::default()
  }
}

/// A client wired to the server through the stdio transport.
struct Harness {
  client: RunningService<RoleClient, TestClient>,
  server: JoinHandle<Result<(), error::Error>>,
}

impl Harness {
  async fn new(uri: String) -> Self {
    let client = QWeatherClient::new(WeatherConfig::new("test-key", uri)).unwrap();
    let api: Arc<dyn QWeatherApi> = Arc::new(client);
    let server = WeatherServer::new(api, None);

    let (client_write, server_read) = tokio::io::duplex(64 * 1024);
    let (server_write, client_read) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(mcp::serve_io(
      server,
      server_read,
      server_write,
      CancellationToken::new(),
    ));

    let client = TestClient
      .serve((client_read, client_write))
      .await
      .expect("client setup failed");
    Self { client, server }
  }

  async fn call(&self, tool: &str, args: Value) -> Result<CallToolResult, ServiceError> {
    self
      .client
      .call_tool(CallToolRequestParams {
        meta: None,
        name: tool.to_string().into(),
        arguments: args.as_object().cloned(),
        task: None,
      })
      .await
  }

  async fn shutdown(self) {
    self.client.cancel().await.unwrap();
    self.server.await.unwrap().unwrap();
  }
}

fn text(result: &CallToolResult) -> String {
  result
    .content
    .first()
    .and_then(|c| c.raw.as_text())
    .map(|t| t.text.clone())
    .unwrap_or_default()
}

#[tokio::test]
async fn lists_the_three_weather_tools() {
  let h = Harness::new("http://127.0.0.1:1".into()).await;
  let tools = h.client.list_tools(None).await.unwrap();

  let mut names: Vec<String> = tools.tools.iter().map(|t| t.name.to_string()).collect();
  names.sort();
  assert_eq!(
    names,
    ["get_current_weather", "get_geo", "get_smart_weather"]
  );

  let smart = tools
    .tools
    .iter()
    .find(|t| t.name == "get_smart_weather")
    .unwrap();
  assert_eq!(smart.input_schema["required"], json!(["query"]));
  h.shutdown().await;
}

#[tokio::test]
async fn smart_weather_resolves_a_city() {
  let provider = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/geo/v2/city/lookup"))
    .and(query_param("location", "Beijing"))
    .and(query_param("key", "test-key"))
    .respond_with(ResponseTemplate::new(200).set_body_string(GEO))
    .mount(&provider)
    .await;
  Mock::given(method("GET"))
    .and(path("/v7/weather/now"))
    .and(query_param("location", "116.41,39.92"))
    .respond_with(ResponseTemplate::new(200).set_body_string(NOW))
    .mount(&provider)
    .await;

  let h = Harness::new(provider.uri()).await;
  let result = h
    .call("get_smart_weather", json!({ "query": "Beijing" }))
    .await
    .unwrap();

  assert_eq!(result.is_error, Some(false));
  let text = text(&result);
  assert!(text.starts_with("Location: Beijing\n"));
  assert!(text.contains("temperature: 21°C"));
  h.shutdown().await;
}

#[tokio::test]
async fn unknown_place_is_an_error_result() {
  let provider = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/geo/v2/city/lookup"))
    .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":"200","location":[]}"#))
    .mount(&provider)
    .await;
  Mock::given(method("GET"))
    .and(path("/v7/weather/now"))
    .respond_with(ResponseTemplate::new(200).set_body_string(NOW))
    .expect(0)
    .mount(&provider)
    .await;

  let h = Harness::new(provider.uri()).await;
  let result = h
    .call("get_smart_weather", json!({ "query": "Nowhereland" }))
    .await
    .unwrap();

  assert_eq!(result.is_error, Some(true));
  assert_eq!(text(&result), "no location found for 'Nowhereland'");
  h.shutdown().await;
}

#[tokio::test]
async fn bad_arguments() {
  let provider = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200).set_body_string(NOW))
    .expect(0)
    .mount(&provider)
    .await;

  let h = Harness::new(provider.uri()).await;

  let result = h.call("get_geo", json!({ "city": "" })).await.unwrap();
  assert_eq!(result.is_error, Some(true));
  assert_eq!(text(&result), "invalid argument: 'city' must not be empty");

  assert!(h.call("get_geo", json!({})).await.is_err());
  assert!(h.call("get_forecast", json!({ "city": "Beijing" })).await.is_err());
  h.shutdown().await;
}
