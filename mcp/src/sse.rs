// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::bridge::{Bridge, Outbound};
use axum::{
  extract::{Query, State},
  http::{header, StatusCode},
  response::{
    sse::{Event, KeepAlive, Sse},
    IntoResponse, Response,
  },
  routing::{get, post},
  Router,
};
use dashmap::DashMap;
use error::Error;
use futures::{stream, StreamExt};
use rmcp::ServerHandler;
use serde::Deserialize;
use std::{convert::Infallible, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

type Sessions = Arc<DashMap<String, Arc<Bridge>>>;
type Factory<S> = Arc<dyn Fn() -> S + Send + Sync>;

struct SseState<S> {
  factory: Factory<S>,
  sessions: Sessions,
  shutdown: CancellationToken,
  base_path: String,
}

impl<S> Clone for SseState<S> {
  fn clone(&self) -> Self {
    Self {
      factory: self.factory.clone(),
      sessions: self.sessions.clone(),
      shutdown: self.shutdown.clone(),
      base_path: self.base_path.clone(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
  #[serde(rename = "sessionId")]
  session_id: String,
}

/// Drops the session once its event stream is gone.
struct SessionGuard {
  id: String,
  sessions: Sessions,
  ct: CancellationToken,
}

impl Drop for SessionGuard {
  fn drop(&mut self) {
    self.ct.cancel();
    if self.sessions.remove(&self.id).is_some() {
      info!("SSE session {} closed", self.id);
    }
  }
}

fn normalize_base_path(base_path: &str) -> String {
  let trimmed = base_path.trim_end_matches('/');
  if trimmed.is_empty() || trimmed.starts_with('/') {
    trimmed.to_string()
  } else {
    format!("/{}", trimmed)
  }
}

/// `GET /health`, `GET {base}/sse` and `POST {base}/message?sessionId=`.
/// Every SSE stream gets its own service built by `factory`.
pub fn router<S, F>(factory: F, shutdown: CancellationToken, base_path: &str) -> Router
where
  S: ServerHandler,
  F: Fn() -> S + Send + Sync + 'static,
{
  let base_path = normalize_base_path(base_path);
  let state = SseState {
    factory: Arc::new(factory) as Factory<S>,
    sessions: Arc::new(DashMap::new()),
    shutdown,
    base_path: base_path.clone(),
  };

  Router::new()
    .route("/health", get(health))
    .route(&format!("{}/sse", base_path), get(handle_sse::<S>))
    .route(&format!("{}/message", base_path), post(handle_message::<S>))
    .with_state(state)
}

pub async fn serve_sse<S, F>(
  factory: F,
  shutdown: CancellationToken,
  addr: &str,
  base_path: &str,
) -> Result<(), Error>
where
  S: ServerHandler,
  F: Fn() -> S + Send + Sync + 'static,
{
  let app = router(factory, shutdown.clone(), base_path);

  let listener = TcpListener::bind(addr).await?;
  info!(
    "MCP SSE server listening on {} (base path '{}')",
    listener.local_addr()?,
    normalize_base_path(base_path)
  );

  axum::serve(listener, app)
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

  info!("MCP SSE server stopped");
  Ok(())
}

async fn health() -> impl IntoResponse {
  ([(header::CONTENT_TYPE, "application/json")], "OK")
}

fn message_events(
  outbound: Outbound,
  guard: SessionGuard,
) -> impl futures::Stream<Item = Result<Event, Infallible>> {
  stream::unfold((outbound, guard), |(mut outbound, guard)| async move {
    match outbound.next_line().await {
      Ok(Some(line)) => Some((
        Ok(Event::default().event("message").data(line)),
        (outbound, guard),
      )),
      Ok(None) => None,
      Err(e) => {
        debug!("SSE session {} output failed: {}", guard.id, e);
        None
      }
    }
  })
}

async fn handle_sse<S: ServerHandler>(State(state): State<SseState<S>>) -> Response {
  let id = Uuid::new_v4().to_string();
  let ct = state.shutdown.child_token();
  let (bridge, outbound) = Bridge::spawn((state.factory)(), ct.clone());

  state.sessions.insert(id.clone(), bridge);
  info!("SSE session {} opened", id);

  let endpoint = format!("{}/message?sessionId={}", state.base_path, id);
  let guard = SessionGuard {
    id,
    sessions: state.sessions.clone(),
    ct: ct.clone(),
  };

  let endpoint_event = Event::default().event("endpoint").data(endpoint);
  let events = stream::once(async move { Ok::<_, Infallible>(endpoint_event) })
    .chain(message_events(outbound, guard))
    .take_until(ct.cancelled_owned());

  Sse::new(events)
    .keep_alive(KeepAlive::default())
    .into_response()
}

async fn handle_message<S: ServerHandler>(
  State(state): State<SseState<S>>,
  Query(query): Query<MessageQuery>,
  body: String,
) -> Response {
  let Some(bridge) = state
    .sessions
    .get(&query.session_id)
    .map(|entry| entry.value().clone())
  else {
    warn!("Message for unknown session {}", query.session_id);
    return (StatusCode::NOT_FOUND, "Session not found").into_response();
  };

  debug!("Message for session {}", query.session_id);
  match bridge.send(&body).await {
    Ok(()) => StatusCode::ACCEPTED.into_response(),
    Err(Error::Json(e)) => (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)).into_response(),
    Err(e) => {
      warn!("SSE session {} rejected a message: {}", query.session_id, e);
      (StatusCode::GONE, "Session closed").into_response()
    }
  }
}
