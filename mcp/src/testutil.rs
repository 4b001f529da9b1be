// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use rmcp::{
  handler::server::{tool::ToolRouter, wrapper::Parameters},
  model::*,
  tool, tool_handler, tool_router, ErrorData, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;

pub fn initialize(id: u64) -> String {
  json!({
    "jsonrpc": "2.0",
    "id": id,
    "method": "initialize",
    "params": {
      "protocolVersion": "2024-11-05",
      "capabilities": {},
      "clientInfo": { "name": "test-client", "version": "0.1.0" }
    }
  })
  .to_string()
}

pub fn call(id: u64, tool: &str, arguments: serde_json::Value) -> String {
  json!({
    "jsonrpc": "2.0",
    "id": id,
    "method": "tools/call",
    "params": { "name": tool, "arguments": arguments }
  })
  .to_string()
}

#[derive(Deserialize, JsonSchema)]
pub struct EchoArgs {
  text: String,
}

#[derive(Clone)]
pub struct EchoServer {
  tool_router: ToolRouter<Self>,
}

#[tool_router]
impl EchoServer {
  pub fn new() -> Self {
    Self {
      tool_router: Self::tool_router(),
    }
  }

  #[tool(description = "Echo the text back after a short pause")]
  async fn slow_echo(
    &self,
    Parameters(args): Parameters<EchoArgs>,
  ) -> Result<CallToolResult, ErrorData> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    Ok(CallToolResult::success(vec![Content::text(args.text)]))
  }
}

#[tool_handler]
impl ServerHandler for EchoServer {
  fn get_info(&self) -> ServerInfo {
    ServerInfo {
      capabilities: ServerCapabilities::builder().enable_tools().build(),
      ..Default::default()
    }
  }
}
