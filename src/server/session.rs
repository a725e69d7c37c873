use log::{error, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::ErrorKind;
use crate::protocol::{ToolResponse, handle_request_line};
use crate::storage::FileOps;

/// Book-keeping for one connected client.
#[derive(Debug)]
pub struct ClientSession {
    connected_at: Instant,
    requests: u64,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            connected_at: Instant::now(),
            requests: 0,
        }
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

pub type ClientRegistry = Arc<Mutex<HashMap<SocketAddr, ClientSession>>>;

/// Serves one client connection until it disconnects.
///
/// - Reads one JSON request per line. Lines over `max_request_bytes` or
///   not valid UTF-8 are discarded and answered with an error.
/// - Runs each tool call on the blocking pool, since it touches the filesystem.
/// - Writes one JSON response line per request, in request order.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    clients: ClientRegistry,
    ops: FileOps,
    max_request_bytes: usize,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf: Vec<u8> = Vec::new();

    loop {
        buf.clear();
        let read = (&mut reader)
            .take(max_request_bytes as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await;

        let n = match read {
            Ok(0) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(n) => n,
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        };

        let response = if n > max_request_bytes {
            warn!("Request from {} exceeds {} bytes", client_addr, max_request_bytes);
            if buf.last() != Some(&b'\n') {
                if let Err(e) = discard_line(&mut reader).await {
                    error!("Failed to read from {}: {}", client_addr, e);
                    break;
                }
            }
            ToolResponse::error(
                ErrorKind::InvalidRequest,
                format!("Request too long (max {} bytes)", max_request_bytes),
            )
        } else {
            match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    if let Some(session) = clients.lock().await.get_mut(&client_addr) {
                        session.requests += 1;
                    }
                    dispatch(ops.clone(), line.to_string()).await
                }
                Err(e) => {
                    warn!("Request from {} is not valid UTF-8: {}", client_addr, e);
                    ToolResponse::error(
                        ErrorKind::InvalidRequest,
                        format!("Request is not valid UTF-8: {}", e),
                    )
                }
            }
        };

        if let Err(e) = write_half.write_all(response.to_line().as_bytes()).await {
            error!("Failed to write to {}: {}", client_addr, e);
            break;
        }
    }

    if let Some(session) = clients.lock().await.remove(&client_addr) {
        info!(
            "Client {} disconnected after {} requests ({:.1?})",
            client_addr,
            session.requests(),
            session.connected_at.elapsed()
        );
    }
}

/// Skips the remainder of an over-long request line.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

async fn dispatch(ops: FileOps, line: String) -> ToolResponse {
    match tokio::task::spawn_blocking(move || handle_request_line(&ops, &line)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Tool call task failed: {}", e);
            ToolResponse::error(ErrorKind::StorageError, "Internal error while handling request")
        }
    }
}
