use crate::game::{Player, PlayerEvent, TransportError};
use crate::messages::{FramedText, WireProtocolError};
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const PLAYER_ID_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("handshake frame did not start with the expected token")]
    TokenMismatch,

    #[error("handshake failed: {0}")]
    Wire(#[from] WireProtocolError),
}

/// Random alphanumeric player id
pub fn generate_player_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PLAYER_ID_LEN)
        .map(char::from)
        .collect()
}

/// Read the first frame and check it is `<token> [...]`.
///
/// On success the connection becomes a [`NetworkPlayer`] with a fresh id.
pub async fn authenticate(
    mut stream: TcpStream,
    framed: FramedText,
    token: &str,
    move_queue_capacity: usize,
) -> Result<NetworkPlayer, HandshakeError> {
    let timeout = framed.config().handshake_timeout;
    let first = framed.read_text_with_timeout(&mut stream, timeout).await?;

    if first.split_whitespace().next() != Some(token) {
        warn!("Rejecting connection with bad handshake token");
        let _ = stream.shutdown().await;
        return Err(HandshakeError::TokenMismatch);
    }

    let player_id = generate_player_id();
    info!(player_id = %player_id, "Handshake accepted");
    Ok(NetworkPlayer::spawn(
        player_id,
        stream,
        framed,
        move_queue_capacity,
    ))
}

/// A player on the other end of a TCP connection.
///
/// Owns a reader task (frames into the bounded inbound queue) and a writer
/// task (outbound queue into frames). Both stop when the player is closed.
pub struct NetworkPlayer {
    id: String,
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::Receiver<PlayerEvent>,
    shutdown: CancellationToken,
    // Cancelled by the reader or writer when the socket fails
    lost: CancellationToken,
}

impl NetworkPlayer {
    pub fn spawn(
        id: String,
        stream: TcpStream,
        framed: FramedText,
        move_queue_capacity: usize,
    ) -> Self {
        let (read_half, write_half) = stream.into_split();
        let (events_tx, inbound) = mpsc::channel(move_queue_capacity.max(1));
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let lost = CancellationToken::new();

        tokio::spawn(read_loop(
            id.clone(),
            read_half,
            framed.clone(),
            events_tx.clone(),
            shutdown.clone(),
            lost.clone(),
        ));
        tokio::spawn(write_loop(
            id.clone(),
            write_half,
            framed,
            outbound_rx,
            events_tx,
            shutdown.clone(),
            lost.clone(),
        ));

        Self {
            id,
            outbound,
            inbound,
            shutdown,
            lost,
        }
    }
}

impl Player for NetworkPlayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(text)
            .map_err(|_| TransportError::SinkClosed {
                player_id: self.id.clone(),
            })
    }

    fn inbound(&mut self) -> &mut mpsc::Receiver<PlayerEvent> {
        &mut self.inbound
    }

    fn close(&self) {
        self.shutdown.cancel();
    }

    fn is_connected(&self) -> bool {
        !self.lost.is_cancelled() && !self.outbound.is_closed()
    }
}

impl Drop for NetworkPlayer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn report(
    events: &mpsc::Sender<PlayerEvent>,
    event: PlayerEvent,
    shutdown: &CancellationToken,
) -> bool {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => false,
        sent = events.send(event) => sent.is_ok(),
    }
}

async fn read_loop(
    player_id: String,
    mut reader: OwnedReadHalf,
    framed: FramedText,
    events: mpsc::Sender<PlayerEvent>,
    shutdown: CancellationToken,
    lost: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            frame = framed.read_text(&mut reader) => frame,
        };

        match frame {
            Ok(text) => {
                // Blocks while the session has not drained the queue
                if !report(&events, PlayerEvent::Message(text), &shutdown).await {
                    break;
                }
            }
            Err(WireProtocolError::ConnectionClosed) => {
                info!(player_id = %player_id, "Connection closed by peer");
                lost.cancel();
                let event = PlayerEvent::Disconnected(TransportError::Disconnected {
                    player_id: player_id.clone(),
                });
                report(&events, event, &shutdown).await;
                break;
            }
            Err(e) => {
                warn!(player_id = %player_id, error = %e, "Read failed");
                lost.cancel();
                let event = PlayerEvent::Disconnected(TransportError::Wire {
                    player_id: player_id.clone(),
                    source: e,
                });
                report(&events, event, &shutdown).await;
                break;
            }
        }
    }
    debug!(player_id = %player_id, "Reader stopped");
}

async fn write_loop(
    player_id: String,
    mut writer: OwnedWriteHalf,
    framed: FramedText,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::Sender<PlayerEvent>,
    shutdown: CancellationToken,
    lost: CancellationToken,
) {
    loop {
        let text = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            text = outbound.recv() => text,
        };
        let Some(text) = text else {
            break;
        };

        if let Err(e) = framed.write_text_with_timeout(&mut writer, &text).await {
            warn!(player_id = %player_id, error = %e, "Write failed");
            lost.cancel();
            let event = PlayerEvent::Disconnected(TransportError::Wire {
                player_id: player_id.clone(),
                source: e,
            });
            report(&events, event, &shutdown).await;
            return;
        }
    }

    // Flush whatever the session queued before closing, e.g. the final gameover
    while let Ok(text) = outbound.try_recv() {
        if framed.write_text_with_timeout(&mut writer, &text).await.is_err() {
            break;
        }
    }
    let _ = writer.shutdown().await;
    debug!(player_id = %player_id, "Writer stopped");
}
