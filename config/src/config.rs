// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::instrument;

pub const ENV_API_KEY: &str = "QWEATHER_API_KEY";
pub const ENV_BASE_URL: &str = "QWEATHER_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "QWEATHER_TIMEOUT_SECS";
pub const ENV_TRANSPORT: &str = "WEATHER_MCP_TRANSPORT";
pub const ENV_ADDR: &str = "WEATHER_MCP_ADDR";
pub const ENV_BASE_PATH: &str = "WEATHER_MCP_BASE_PATH";
pub const ENV_LOG_LEVEL: &str = "WEATHER_MCP_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "WEATHER_MCP_LOG_FILE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub qweather: QWeatherConfig,
  pub server: ServerConfig,
  pub log: LogConfig,
}

/// Upstream provider settings. Empty values are accepted as-is; the provider
/// rejects them at call time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QWeatherConfig {
  pub api_key: String,
  pub base_url: String,
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub transport: Transport,
  pub addr: String,
  pub base_path: String,
  /// Per tool call deadline, 0 disables it.
  pub tool_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  pub level: String,
  pub color: bool,
  pub time_format: String,
  pub file: Option<PathBuf>,
  pub target: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
  Stdio,
  Sse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTarget {
  Stdout,
  Stderr,
}

impl Default for QWeatherConfig {
  fn default() -> Self {
    Self {
      api_key: String::new(),
      base_url: String::new(),
      timeout_secs: 10,
    }
  }
}

impl QWeatherConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      transport: Transport::Sse,
      addr: "0.0.0.0:8080".into(),
      base_path: "/weather".into(),
      tool_timeout_secs: 30,
    }
  }
}

impl ServerConfig {
  pub fn tool_timeout(&self) -> Option<Duration> {
    (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
  }
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      color: true,
      time_format: "%Y-%m-%d %H:%M:%S%.3f".into(),
      file: None,
      target: LogTarget::Stdout,
    }
  }
}

impl Config {
  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Self = toml::from_str(&content)
      .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!("Loaded configuration successfully");
    Ok(config)
  }

  /// Defaults, then the optional TOML file, then the process environment.
  pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
    let config = match path {
      Some(path) => Self::from_file(path)?,
      None => Self::default(),
    };
    config.with_env(|key| std::env::var(key).ok())
  }

  pub fn with_env<F>(mut self, lookup: F) -> anyhow::Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(api_key) = lookup(ENV_API_KEY) {
      self.qweather.api_key = api_key;
    }
    if let Some(base_url) = lookup(ENV_BASE_URL) {
      self.qweather.base_url = base_url;
    }
    if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
      self.qweather.timeout_secs = secs
        .trim()
        .parse()
        .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a number of seconds, got '{secs}'"))?;
    }
    if let Some(transport) = lookup(ENV_TRANSPORT) {
      self.server.transport = transport.parse()?;
    }
    if let Some(addr) = lookup(ENV_ADDR) {
      self.server.addr = addr;
    }
    if let Some(base_path) = lookup(ENV_BASE_PATH) {
      self.server.base_path = base_path;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
      self.log.level = level;
    }
    if let Some(file) = lookup(ENV_LOG_FILE).filter(|f| !f.is_empty()) {
      self.log.file = Some(file.into());
    }
    Ok(self)
  }
}

impl FromStr for Transport {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "stdio" => Ok(Transport::Stdio),
      "sse" => Ok(Transport::Sse),
      other => bail!("Unknown transport '{other}'. Supported transports: stdio, sse."),
    }
  }
}

impl std::fmt::Display for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let transport = match self {
      Transport::Stdio => "stdio",
      Transport::Sse => "sse",
    };
    write!(f, "{}", transport)
  }
}
