// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::bridge::Bridge;
use error::Error;
use rmcp::ServerHandler;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Serves `handler` over the process stdin/stdout.
pub async fn serve_stdio<S: ServerHandler>(handler: S, shutdown: CancellationToken) -> Result<(), Error> {
  serve_io(handler, tokio::io::stdin(), tokio::io::stdout(), shutdown).await
}

/// Newline-delimited JSON-RPC over any reader/writer pair. End of input stops
/// reading but requests already received still get their responses; only
/// `shutdown` abandons them.
#[instrument(skip_all)]
pub async fn serve_io<S, R, W>(
  handler: S,
  reader: R,
  mut writer: W,
  shutdown: CancellationToken,
) -> Result<(), Error>
where
  S: ServerHandler,
  R: AsyncRead + Unpin,
  W: AsyncWrite + Unpin + Send + 'static,
{
  let (bridge, mut outbound) = Bridge::spawn(handler, shutdown.child_token());

  let pump_bridge = bridge.clone();
  let pump = tokio::spawn(async move {
    while let Some(line) = outbound.next_line().await? {
      pump_bridge.observe(&line);
      writer.write_all(line.as_bytes()).await?;
      writer.write_all(b"\n").await?;
      writer.flush().await?;
    }
    Ok::<_, Error>(())
  });

  info!("MCP server listening on stdio");
  let mut lines = BufReader::new(reader).lines();
  loop {
    let line = tokio::select! {
      _ = shutdown.cancelled() => {
        info!("Shutdown requested, closing stdio transport");
        break;
      }
      line = lines.next_line() => line?,
    };

    let Some(line) = line else {
      debug!("stdin closed, {} request(s) in flight", bridge.pending());
      tokio::select! {
        _ = bridge.drained() => {}
        _ = shutdown.cancelled() => {}
      }
      break;
    };
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    if let Err(e) = bridge.send(line).await {
      warn!("Dropping client message: {}", e);
    }
  }

  bridge.close().await;
  match pump.await {
    Ok(result) => result,
    Err(e) => Err(Error::Protocol(format!("stdio writer task failed: {}", e))),
  }
}
