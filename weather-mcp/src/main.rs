// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use anyhow::{Context, Result};
use base::Logger;
use clap::Parser;
use config::{Config, LogTarget, Transport};
use mcp::{serve_sse, serve_stdio};
use std::{path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use weather::{QWeatherApi, QWeatherClient, WeatherConfig};
use weather_mcp::WeatherServer;

#[derive(Debug, Parser)]
#[command(name = "weather-mcp", version, about = "QWeather tools over MCP")]
struct Args {
  /// TOML configuration file
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// stdio or sse
  #[arg(short, long)]
  transport: Option<Transport>,

  /// Bind address for the SSE transport
  #[arg(long)]
  addr: Option<String>,

  #[arg(long)]
  log_level: Option<String>,
}

pub struct ServiceRunner {
  config: Config,
  server: WeatherServer,
  shutdown: CancellationToken,
}

#[tokio::main]
async fn main() -> Result<()> {
  #[cfg(debug_assertions)]
  base::dotenv::load()?;

  let args = Args::parse();
  let mut config = Config::load(args.config.as_deref())?;
  args.apply(&mut config);

  // stdout carries the protocol in stdio mode
  if config.server.transport == Transport::Stdio {
    config.log.target = LogTarget::Stderr;
  }
  Logger::new(&config.log)?.install()?;

  ServiceRunner::new(config)?.run().await
}

impl Args {
  fn apply(self, config: &mut Config) {
    if let Some(transport) = self.transport {
      config.server.transport = transport;
    }
    if let Some(addr) = self.addr {
      config.server.addr = addr;
    }
    if let Some(level) = self.log_level {
      config.log.level = level;
    }
  }
}

impl ServiceRunner {
  #[instrument(skip(config))]
  pub fn new(config: Config) -> Result<Self> {
    let client = QWeatherClient::new(WeatherConfig::from(&config.qweather))
      .context("Failed to build QWeather client")?;
    let api: Arc<dyn QWeatherApi> = Arc::new(client);
    let server = WeatherServer::new(api, config.server.tool_timeout());
    Ok(Self {
      config,
      server,
      shutdown: CancellationToken::new(),
    })
  }

  #[instrument(skip(self))]
  pub async fn run(&self) -> Result<()> {
    let shutdown = self.shutdown.clone();
    tokio::spawn(async move {
      match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
      }
      shutdown.cancel();
    });

    info!(
      "Starting {} over {}",
      weather_mcp::SERVER_NAME,
      self.config.server.transport
    );
    match self.config.server.transport {
      Transport::Stdio => serve_stdio(self.server.clone(), self.shutdown.clone()).await,
      Transport::Sse => {
        let server = self.server.clone();
        serve_sse(
          move || server.clone(),
          self.shutdown.clone(),
          &self.config.server.addr,
          &self.config.server.base_path,
        )
        .await
      }
    }
    .context("MCP server failed")
  }
}
