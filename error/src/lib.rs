// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::fmt;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("invalid argument: {0}")]
  Validation(String),
  #[error(transparent)]
  Transport(#[from] TransportError),
  #[error("{0}")]
  Cancelled(CancelReason),
  #[error("failed to decode {what} response: {source}, raw body: {body}")]
  Decode {
    what: &'static str,
    body: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("provider returned business code {code}, raw body: {body}")]
  Provider { code: String, body: String },
  #[error("no location found for '{0}'")]
  NotFound(String),
  #[error("{context}: {source}")]
  Context {
    context: String,
    #[source]
    source: Box<Error>,
  },
  #[error("Configuration error: {0}")]
  Config(String),
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Protocol error: {0}")]
  Protocol(String),
}

#[derive(ThisError, Debug)]
pub enum TransportError {
  #[error("request to {path} failed with status {status}, body: {body}")]
  Status {
    path: String,
    status: u16,
    body: String,
  },
  #[error("request to {path} failed: {source}")]
  Network {
    path: String,
    #[source]
    source: reqwest::Error,
  },
  #[error("invalid request url for {path}: {source}")]
  InvalidUrl {
    path: String,
    #[source]
    source: url::ParseError,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
  Cancelled,
  DeadlineExceeded,
}

impl fmt::Display for CancelReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CancelReason::Cancelled => f.write_str("request cancelled"),
      CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
    }
  }
}

impl Error {
  /// Wraps the error with a description of the failing step.
  ///
  /// Cancellation is returned untouched so callers can still match on it.
  pub fn context(self, context: impl Into<String>) -> Self {
    match self {
      Error::Cancelled(_) => self,
      other => Error::Context {
        context: context.into(),
        source: Box::new(other),
      },
    }
  }

  /// The innermost error below any context layers.
  pub fn root(&self) -> &Error {
    let mut current = self;
    while let Error::Context { source, .. } = current {
      current = source;
    }
    current
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self.root(), Error::Cancelled(_))
  }

  /// Raw provider body carried by the underlying failure, if any.
  pub fn raw_body(&self) -> Option<&str> {
    match self.root() {
      Error::Decode { body, .. } | Error::Provider { body, .. } => Some(body),
      Error::Transport(TransportError::Status { body, .. }) => Some(body),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn context_keeps_the_original_cause() {
    let err = Error::Provider {
      code: "401".into(),
      body: r#"{"code":"401"}"#.into(),
    }
    .context("resolving location for Beijing");

    assert_eq!(
      err.to_string(),
      r#"resolving location for Beijing: provider returned business code 401, raw body: {"code":"401"}"#
    );
    assert!(matches!(err.root(), Error::Provider { code, .. } if code == "401"));
    assert_eq!(err.raw_body(), Some(r#"{"code":"401"}"#));
  }

  #[test]
  fn cancellation_is_never_wrapped() {
    let err = Error::Cancelled(CancelReason::DeadlineExceeded)
      .context("fetching weather for coordinates 116.41,39.92");

    assert!(matches!(
      err,
      Error::Cancelled(CancelReason::DeadlineExceeded)
    ));
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "deadline exceeded");
  }

  #[test]
  fn raw_body_walks_nested_context() {
    let err = Error::Transport(TransportError::Status {
      path: "/v7/weather/now".into(),
      status: 403,
      body: "forbidden".into(),
    })
    .context("inner")
    .context("outer");

    assert_eq!(err.raw_body(), Some("forbidden"));
    assert!(!err.is_cancelled());
    assert_eq!(Error::NotFound("Nowhereland".into()).raw_body(), None);
  }
}
