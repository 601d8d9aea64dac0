use super::connection::{authenticate, HandshakeError};
use crate::game::{MatchmakerHandle, DEFAULT_MOVE_QUEUE_CAPACITY};
use crate::messages::{FramedText, WireConfig};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_AUTH_TOKEN: &str = "TOKEN";

/// What the server needs to turn a socket into a queued player.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub auth_token: String,
    pub wire: WireConfig,
    pub move_queue_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            wire: WireConfig::default(),
            move_queue_capacity: DEFAULT_MOVE_QUEUE_CAPACITY,
        }
    }
}

pub struct Server {
    listener: TcpListener,
    settings: Arc<ServerSettings>,
}

impl Server {
    pub async fn bind(addr: &str, settings: ServerSettings) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind server to address: {}", addr))?;

        info!("Server successfully bound to address: {}", addr);
        debug!(
            "Wire config - max_message_size: {}, handshake_timeout: {:?}, write_timeout: {:?}",
            settings.wire.max_message_size,
            settings.wire.handshake_timeout,
            settings.wire.write_timeout
        );

        Ok(Self {
            listener,
            settings: Arc::new(settings),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read listener address")
    }

    /// Accept connections until `shutdown` fires, handing authenticated
    /// players to the matchmaker.
    pub async fn run(self, matchmaker: MatchmakerHandle, shutdown: CancellationToken) -> Result<()> {
        info!("Starting server on address: {:?}", self.listener.local_addr()?);

        // Connections still in their handshake
        let mut pending: HashMap<usize, JoinHandle<()>> = HashMap::new();
        let mut connection_counter = 0usize;

        loop {
            let accepted = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer_addr)) => {
                    connection_counter += 1;
                    let connection_id = connection_counter;
                    info!("Accepted new connection {} from {}", connection_id, peer_addr);

                    let settings = Arc::clone(&self.settings);
                    let matchmaker = matchmaker.clone();
                    let handle = task::spawn(async move {
                        if let Err(e) =
                            Self::handle_connection(stream, settings, matchmaker, connection_id)
                                .await
                        {
                            error!("Connection {} failed: {}", connection_id, e);
                        }
                    });
                    pending.insert(connection_id, handle);

                    pending.retain(|id, handle| {
                        if handle.is_finished() {
                            debug!("Cleaning up finished handshake {}", id);
                            false
                        } else {
                            true
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            }
        }

        for (_, handle) in pending {
            handle.abort();
        }
        info!("Server stopped accepting connections");
        Ok(())
    }

    #[instrument(skip(stream, settings, matchmaker))]
    async fn handle_connection(
        stream: TcpStream,
        settings: Arc<ServerSettings>,
        matchmaker: MatchmakerHandle,
        connection_id: usize,
    ) -> Result<(), HandshakeError> {
        let _ = stream.set_nodelay(true);
        let framed = FramedText::new(settings.wire.clone());
        let player = authenticate(
            stream,
            framed,
            &settings.auth_token,
            settings.move_queue_capacity,
        )
        .await?;

        if let Err(e) = matchmaker.enqueue(Box::new(player)) {
            error!("Connection {} could not be queued: {}", connection_id, e);
        }
        Ok(())
    }
}
