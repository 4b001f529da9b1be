// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::Error;
use rmcp::{ServerHandler, ServiceExt};
use serde_json::Value;
use std::{
  collections::HashMap,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
};
use tokio::{
  io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf},
  sync::Notify,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const BUFFER_SIZE: usize = 64 * 1024;

/// Server-to-client lines, one JSON-RPC message each.
pub type Outbound = Lines<BufReader<ReadHalf<DuplexStream>>>;

/// Line-delimited pipe between an outer framing (a stdio pipe, an SSE
/// session) and one rmcp service. Keeps count of requests still waiting for
/// a response so the input side can be closed without losing them.
pub struct Bridge {
  inbound: tokio::sync::Mutex<Option<WriteHalf<DuplexStream>>>,
  pending: Mutex<HashMap<String, usize>>,
  finished: AtomicBool,
  idle: Notify,
}

fn request_key(id: &Value) -> String {
  id.to_string()
}

fn messages(value: &Value) -> Vec<&Value> {
  match value {
    Value::Array(batch) => batch.iter().collect(),
    other => vec![other],
  }
}

impl Bridge {
  /// Starts `handler` on a fresh in-process transport. The service stops when
  /// `ct` fires or the inbound side is closed.
  pub fn spawn<S: ServerHandler>(handler: S, ct: CancellationToken) -> (Arc<Self>, Outbound) {
    let (client, server) = tokio::io::duplex(BUFFER_SIZE);
    let (reader, writer) = tokio::io::split(client);

    let bridge = Arc::new(Self {
      inbound: tokio::sync::Mutex::new(Some(writer)),
      pending: Mutex::new(HashMap::new()),
      finished: AtomicBool::new(false),
      idle: Notify::new(),
    });

    let service_bridge = bridge.clone();
    tokio::spawn(async move {
      match handler.serve_with_ct(server, ct).await {
        Ok(running) => match running.waiting().await {
          Ok(reason) => info!("MCP service stopped: {:?}", reason),
          Err(e) => warn!("MCP service task failed: {}", e),
        },
        Err(e) => warn!("MCP session failed to initialize: {}", e),
      }
      service_bridge.finish();
    });

    (bridge, BufReader::new(reader).lines())
  }

  /// Forwards one client message. Malformed JSON is rejected before it
  /// reaches the service.
  pub async fn send(&self, message: &str) -> Result<(), Error> {
    let value: Value = serde_json::from_str(message)?;
    for message in messages(&value) {
      self.track_inbound(message);
    }

    let mut line = serde_json::to_vec(&value)?;
    line.push(b'\n');

    let mut inbound = self.inbound.lock().await;
    let writer = inbound
      .as_mut()
      .ok_or_else(|| Error::Protocol("session input already closed".into()))?;
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
  }

  /// Records a server message on its way out. Responses settle the matching
  /// request.
  pub fn observe(&self, line: &str) {
    let Ok(value) = serde_json::from_str::<Value>(line) else {
      return;
    };
    for message in messages(&value) {
      if message.get("method").is_none() {
        if let Some(id) = message.get("id") {
          self.settle(&request_key(id));
        }
      }
    }
  }

  /// Number of client requests without a response yet.
  pub fn pending(&self) -> usize {
    self.lock_pending().values().sum()
  }

  /// Resolves once every forwarded request has been answered or the service
  /// has stopped.
  pub async fn drained(&self) {
    loop {
      let notified = self.idle.notified();
      if self.finished.load(Ordering::SeqCst) || self.pending() == 0 {
        return;
      }
      notified.await;
    }
  }

  /// Ends the inbound stream. The service sees EOF and shuts down.
  pub async fn close(&self) {
    if let Some(mut writer) = self.inbound.lock().await.take() {
      if let Err(e) = writer.shutdown().await {
        debug!("Failed to close session input: {}", e);
      }
    }
  }

  fn track_inbound(&self, message: &Value) {
    let Some(method) = message.get("method").and_then(Value::as_str) else {
      return;
    };
    if let Some(id) = message.get("id") {
      *self.lock_pending().entry(request_key(id)).or_insert(0) += 1;
    } else if method == "notifications/cancelled" {
      // the service may never answer a cancelled request
      if let Some(id) = message.pointer("/params/requestId") {
        self.settle(&request_key(id));
      }
    }
  }

  fn settle(&self, key: &str) {
    let idle = {
      let mut pending = self.lock_pending();
      if let Some(count) = pending.get_mut(key) {
        *count -= 1;
        if *count == 0 {
          pending.remove(key);
        }
      }
      pending.is_empty()
    };
    if idle {
      self.idle.notify_waiters();
    }
  }

  fn finish(&self) {
    self.finished.store(true, Ordering::SeqCst);
    self.lock_pending().clear();
    self.idle.notify_waiters();
  }

  fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
    self
      .pending
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
