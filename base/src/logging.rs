// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::{LogConfig, LogTarget};
use error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::{
  fmt::{self, time::ChronoLocal, writer::BoxMakeWriter},
  layer::SubscriberExt,
  reload, EnvFilter, Registry,
};

/// A configured subscriber. Components that need their own sink can take
/// `dispatch()`, everything else goes through `install()`.
#[derive(Clone)]
pub struct Logger {
  dispatch: Dispatch,
  filter: reload::Handle<EnvFilter, Registry>,
}

fn parse_filter(level: &str) -> Result<EnvFilter, Error> {
  EnvFilter::try_new(level)
    .map_err(|e| Error::Config(format!("invalid log level '{}': {}", level, e)))
}

impl Logger {
  pub fn new(config: &LogConfig) -> Result<Self, Error> {
    let filter = match EnvFilter::try_from_default_env() {
      Ok(filter) => filter,
      Err(_) => parse_filter(&config.level)?,
    };

    let (writer, ansi) = match (&config.file, config.target) {
      (Some(path), _) => {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        (BoxMakeWriter::new(Mutex::new(file)), false)
      }
      (None, LogTarget::Stdout) => (BoxMakeWriter::new(std::io::stdout), config.color),
      (None, LogTarget::Stderr) => (BoxMakeWriter::new(std::io::stderr), config.color),
    };

    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry().with(filter).with(
      fmt::layer()
        .with_timer(ChronoLocal::new(config.time_format.clone()))
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(ansi)
        .with_writer(writer),
    );

    Ok(Self {
      dispatch: Dispatch::new(subscriber),
      filter: handle,
    })
  }

  pub fn dispatch(&self) -> Dispatch {
    self.dispatch.clone()
  }

  /// Swaps the level directive at runtime, e.g. `debug` or `weather=trace`.
  pub fn set_level(&self, level: &str) -> Result<(), Error> {
    let filter = parse_filter(level)?;
    self
      .filter
      .reload(filter)
      .map_err(|e| Error::Config(format!("failed to reload log level: {}", e)))
  }

  /// Makes this logger the process-wide default.
  pub fn install(&self) -> Result<(), Error> {
    tracing::dispatcher::set_global_default(self.dispatch.clone())
      .map_err(|e| Error::Config(format!("logger already installed: {}", e)))
  }
}
