use super::error::TransportError;
use crate::messages::Outbound;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default capacity of a player's inbound move queue.
pub const DEFAULT_MOVE_QUEUE_CAPACITY: usize = 2;

/// Something a player's connection produced for its session.
#[derive(Debug)]
pub enum PlayerEvent {
    Message(String),
    Disconnected(TransportError),
}

/// Capability a session holds for one connected participant.
///
/// Implemented by [`crate::network::NetworkPlayer`] for live connections and by
/// [`ChannelPlayer`] for in-memory use.
pub trait Player: Send + 'static {
    fn id(&self) -> &str;

    /// Queue one text message for delivery. Never blocks.
    fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Bounded queue of inbound requests. `None` means the connection is gone.
    fn inbound(&mut self) -> &mut mpsc::Receiver<PlayerEvent>;

    /// Stop every background task serving this player.
    fn close(&self);

    /// False once the connection is known to be gone.
    fn is_connected(&self) -> bool;

    fn notify(&self, message: &Outbound) -> Result<(), TransportError> {
        self.send_text(message.to_string())
    }
}

/// In-memory player driven through a [`PlayerPeer`].
pub struct ChannelPlayer {
    id: String,
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::Receiver<PlayerEvent>,
    closed: CancellationToken,
    lost: CancellationToken,
}

/// The remote end of a [`ChannelPlayer`].
pub struct PlayerPeer {
    id: String,
    moves: mpsc::Sender<PlayerEvent>,
    notifications: mpsc::UnboundedReceiver<String>,
    closed: CancellationToken,
    lost: CancellationToken,
}

impl ChannelPlayer {
    pub fn pair(id: impl Into<String>, capacity: usize) -> (ChannelPlayer, PlayerPeer) {
        let id = id.into();
        let (moves, inbound) = mpsc::channel(capacity);
        let (outbound, notifications) = mpsc::unbounded_channel();
        let closed = CancellationToken::new();
        let lost = CancellationToken::new();

        (
            ChannelPlayer {
                id: id.clone(),
                outbound,
                inbound,
                closed: closed.clone(),
                lost: lost.clone(),
            },
            PlayerPeer {
                id,
                moves,
                notifications,
                closed,
                lost,
            },
        )
    }
}

impl Player for ChannelPlayer {
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
        self.closed.cancel();
    }

    fn is_connected(&self) -> bool {
        !self.lost.is_cancelled() && !self.outbound.is_closed()
    }
}

impl PlayerPeer {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Submit raw text. Waits while the player's queue is full.
    pub async fn send(&self, text: impl Into<String>) -> Result<(), TransportError> {
        self.moves
            .send(PlayerEvent::Message(text.into()))
            .await
            .map_err(|_| TransportError::Disconnected {
                player_id: self.id.clone(),
            })
    }

    /// Report a transport failure to the session.
    pub async fn disconnect(&self) {
        self.lost.cancel();
        let _ = self
            .moves
            .send(PlayerEvent::Disconnected(TransportError::Disconnected {
                player_id: self.id.clone(),
            }))
            .await;
    }

    /// Next notification, or `None` once the player has been dropped.
    pub async fn recv(&mut self) -> Option<String> {
        self.notifications.recv().await
    }

    pub fn try_recv(&mut self) -> Option<String> {
        self.notifications.try_recv().ok()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves when the session closes this player.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }
}
