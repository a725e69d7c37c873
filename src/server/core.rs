use log::{error, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::config::GatewayConfig;
use crate::error::ErrorKind;
use crate::protocol::ToolResponse;
use crate::server::session::{ClientRegistry, ClientSession, handle_client};
use crate::storage::FileOps;

pub struct Server {
    client_registry: ClientRegistry,
    listener: TcpListener,
    config: Arc<GatewayConfig>,
    ops: FileOps,
}

impl Server {
    /// Binds the request listener. Every connection shares `ops`.
    pub async fn bind(config: GatewayConfig, ops: FileOps) -> std::io::Result<Self> {
        let socket = config.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        for root in ops.guard().roots().iter() {
            info!("Allowed directory: {}", root.path().display());
        }

        Ok(Self {
            client_registry: Arc::new(Mutex::new(HashMap::new())),
            listener,
            config: Arc::new(config),
            ops,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting file gateway on {} (max {} clients)",
            self.config.listen_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let config = Arc::clone(&self.config);
                    let ops = self.ops.clone();

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, client_registry, config, ops).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new client and hands it to the session handler, or turns it
/// away when the server is full.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: ClientRegistry,
    config: Arc<GatewayConfig>,
    ops: FileOps,
) -> Result<(), std::io::Error> {
    {
        let mut clients = client_registry.lock().await;

        if clients.len() >= config.max_clients {
            let response = ToolResponse::error(
                ErrorKind::InvalidRequest,
                "Too many connections. Try again later.",
            );
            stream.write_all(response.to_line().as_bytes()).await?;
            return Ok(());
        }

        clients.insert(client_addr, ClientSession::new());
        info!(
            "Client connected: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            config.max_clients
        );
    }

    handle_client(
        stream,
        client_addr,
        client_registry,
        ops,
        config.max_request_bytes,
    )
    .await;

    Ok(())
}
