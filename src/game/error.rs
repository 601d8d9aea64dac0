use crate::messages::WireProtocolError;
use thiserror::Error;

/// Connection-level failure for one player. Terminal for the session.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("player {player_id} disconnected")]
    Disconnected { player_id: String },

    #[error("outbound queue for player {player_id} is closed")]
    SinkClosed { player_id: String },

    #[error("wire protocol error for player {player_id}: {source}")]
    Wire {
        player_id: String,
        #[source]
        source: WireProtocolError,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session cancelled by shutdown")]
    Cancelled,

    #[error("could not start session: {0}")]
    StartFailed(#[source] TransportError),
}

#[derive(Debug, Error)]
pub enum MatchmakerError {
    #[error("matchmaker is no longer accepting players")]
    Closed,
}
