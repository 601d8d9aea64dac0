//! Helpers for driving sessions through in-memory players

use duel::game::{
    ChannelPlayer, ClockConfig, GameOutcome, PlayerPeer, Session, SessionConfig, SessionError,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A running session and both ends of its players
pub struct TestGame {
    pub white: PlayerPeer,
    pub black: PlayerPeer,
    pub shutdown: CancellationToken,
    pub task: JoinHandle<Result<GameOutcome, SessionError>>,
}

pub fn session_config(start_ticks: u32) -> SessionConfig {
    SessionConfig {
        clock: ClockConfig {
            start_ticks,
            tick_interval: Duration::from_secs(1),
        },
    }
}

/// Start a session with fresh players; the start notifications are consumed.
pub async fn start_game(start_ticks: u32) -> TestGame {
    let (white, mut white_peer) = ChannelPlayer::pair("white-player", 2);
    let (black, mut black_peer) = ChannelPlayer::pair("black-player", 2);
    let shutdown = CancellationToken::new();

    let session = Session::start(
        Uuid::new_v4(),
        Box::new(white),
        Box::new(black),
        session_config(start_ticks),
        shutdown.clone(),
    )
    .expect("session should start");

    assert_eq!(recv(&mut white_peer).await, "StartWhite");
    assert_eq!(recv(&mut black_peer).await, "StartBlack");

    TestGame {
        white: white_peer,
        black: black_peer,
        shutdown,
        task: tokio::spawn(session.run()),
    }
}

/// Next notification for `peer`, failing the test if none arrives
pub async fn recv(peer: &mut PlayerPeer) -> String {
    tokio::time::timeout(RECV_TIMEOUT, peer.recv())
        .await
        .unwrap_or_else(|_| panic!("timed out waiting on {}", peer.id()))
        .unwrap_or_else(|| panic!("notifications for {} ended", peer.id()))
}

/// Sequence number carried by a `state` snapshot
pub fn state_sequence(snapshot: &str) -> i64 {
    let mut tokens = snapshot.split_whitespace();
    assert_eq!(tokens.next(), Some("state"), "not a snapshot: {}", snapshot);
    tokens
        .next()
        .and_then(|seq| seq.parse().ok())
        .unwrap_or_else(|| panic!("snapshot without sequence: {}", snapshot))
}

/// The 64 `(hasMoved, side, piece)` triples of a `state` snapshot
pub fn state_squares(snapshot: &str) -> Vec<String> {
    snapshot
        .split('(')
        .skip(1)
        .map(|triple| triple.trim().trim_end_matches(')').to_string())
        .collect()
}

/// Ask for a snapshot as `peer`, who must hold the turn
pub async fn fetch_state(peer: &mut PlayerPeer) -> String {
    peer.send("needState").await.unwrap();
    let snapshot = recv(peer).await;
    assert!(snapshot.starts_with("state "), "expected snapshot, got {}", snapshot);
    snapshot
}
