// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::{CancelReason, Error};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline carried from an incoming call down to every
/// outbound request it makes.
#[derive(Debug, Clone, Default)]
pub struct Context {
  token: CancellationToken,
  deadline: Option<Instant>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_token(token: CancellationToken) -> Self {
    Self {
      token,
      deadline: None,
    }
  }

  /// Tightens the deadline; an earlier existing deadline wins.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    let deadline = Instant::now() + timeout;
    self.deadline = Some(match self.deadline {
      Some(current) => current.min(deadline),
      None => deadline,
    });
    self
  }

  /// Cancelled together with `self`, but cancelling the child leaves `self` alone.
  pub fn child(&self) -> Self {
    Self {
      token: self.token.child_token(),
      deadline: self.deadline,
    }
  }

  pub fn cancel(&self) {
    self.token.cancel();
  }

  pub fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }

  pub fn token(&self) -> &CancellationToken {
    &self.token
  }

  pub fn deadline(&self) -> Option<Instant> {
    self.deadline
  }

  /// Drives `fut` until it completes, the token fires or the deadline passes.
  pub async fn run<F, T>(&self, fut: F) -> Result<T, Error>
  where
    F: Future<Output = Result<T, Error>>,
  {
    let deadline = async {
      match self.deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
      }
    };

    tokio::select! {
      biased;
      _ = self.token.cancelled() => Err(Error::Cancelled(CancelReason::Cancelled)),
      _ = deadline => Err(Error::Cancelled(CancelReason::DeadlineExceeded)),
      res = fut => res,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn completes_when_nothing_fires() {
    let ctx = Context::new().with_timeout(Duration::from_secs(5));
    let out = ctx.run(async { Ok::<_, Error>(42) }).await.unwrap();
    assert_eq!(out, 42);
  }

  #[tokio::test]
  async fn cancelled_token_wins() {
    let ctx = Context::new();
    ctx.cancel();
    let err = ctx
      .run(async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, Error>(())
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Cancelled(CancelReason::Cancelled)));
  }

  #[tokio::test]
  async fn deadline_expiry_is_reported() {
    let ctx = Context::new().with_timeout(Duration::from_millis(20));
    let err = ctx
      .run(async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, Error>(())
      })
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Cancelled(CancelReason::DeadlineExceeded)
    ));
  }

  #[tokio::test]
  async fn child_follows_parent_but_not_the_other_way() {
    let parent = Context::new();
    let child = parent.child();
    child.cancel();
    assert!(!parent.is_cancelled());

    let other = parent.child();
    parent.cancel();
    assert!(other.is_cancelled());
  }

  #[test]
  fn earlier_deadline_is_kept() {
    let ctx = Context::new().with_timeout(Duration::from_millis(10));
    let first = ctx.deadline().unwrap();
    let ctx = ctx.with_timeout(Duration::from_secs(60));
    assert_eq!(ctx.deadline(), Some(first));
  }
}
