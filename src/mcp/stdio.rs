//! Newline-delimited JSON-RPC over standard input and output.

use super::jsonrpc::{self, INVALID_REQUEST, JsonRpcRequest, PARSE_ERROR};
use super::server::McpServer;
use crate::task::ports::{PrivilegedCommands, TaskStore};
use mockable::Clock;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Serves requests from `reader` until end of input, writing one response
/// line per request to `writer`.
///
/// # Errors
///
/// Returns an I/O error when reading or writing fails.
pub async fn serve<S, P, C, R, W>(
    server: &mut McpServer<S, P, C>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        if let Some(reply) = handle_line(server, raw).await {
            let mut encoded = serde_json::to_vec(&reply)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }
    Ok(())
}

/// Serves the process's own stdin and stdout.
///
/// # Errors
///
/// Returns an I/O error when reading or writing fails.
pub async fn run_stdio<S, P, C>(server: &mut McpServer<S, P, C>) -> std::io::Result<()>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
{
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    serve(server, reader, tokio::io::stdout()).await
}

async fn handle_line<S, P, C>(server: &mut McpServer<S, P, C>, raw: &str) -> Option<Value>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
{
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            return Some(jsonrpc::error(
                None,
                PARSE_ERROR,
                &format!("Parse error: {err}"),
            ));
        }
    };
    let id = value.get("id").cloned();
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => server.handle(request).await,
        Err(err) => Some(jsonrpc::error(
            id,
            INVALID_REQUEST,
            &format!("Invalid request: {err}"),
        )),
    }
}
