//! FIFO pairing of waiting players into sessions.
//!
//! The first player dequeued plays White. A lone player waits until a second
//! one arrives or the matchmaker shuts down.

use super::error::{MatchmakerError, SessionError};
use super::outcome::GameOutcome;
use super::player::Player;
use super::session::{Session, SessionConfig};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How a session formed by the matchmaker ended.
#[derive(Debug)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub white_id: String,
    pub black_id: String,
    pub result: Result<GameOutcome, SessionError>,
}

/// Cloneable enqueue side of a [`Matchmaker`].
#[derive(Clone)]
pub struct MatchmakerHandle {
    tx: mpsc::UnboundedSender<Box<dyn Player>>,
}

impl MatchmakerHandle {
    /// Add a player to the back of the waiting queue. Never blocks.
    pub fn enqueue(&self, player: Box<dyn Player>) -> Result<(), MatchmakerError> {
        let player_id = player.id().to_string();
        match self.tx.send(player) {
            Ok(()) => {
                debug!(player_id = %player_id, "Player queued for matchmaking");
                Ok(())
            }
            Err(mpsc::error::SendError(player)) => {
                player.close();
                Err(MatchmakerError::Closed)
            }
        }
    }
}

pub struct Matchmaker {
    queue: mpsc::UnboundedReceiver<Box<dyn Player>>,
    config: SessionConfig,
    shutdown: CancellationToken,
    reports: Option<mpsc::UnboundedSender<SessionReport>>,
}

impl Matchmaker {
    pub fn new(config: SessionConfig, shutdown: CancellationToken) -> (Self, MatchmakerHandle) {
        let (tx, queue) = mpsc::unbounded_channel();
        (
            Self {
                queue,
                config,
                shutdown,
                reports: None,
            },
            MatchmakerHandle { tx },
        )
    }

    /// Deliver a [`SessionReport`] for every session this matchmaker starts.
    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<SessionReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Pair players until shutdown. Sessions run on their own tasks.
    pub async fn run(mut self) {
        info!("Matchmaker started");
        // Front of the queue: a player still waiting for an opponent
        let mut waiting: Option<Box<dyn Player>> = None;
        loop {
            let white = match waiting.take() {
                Some(player) => player,
                None => match self.next_player().await {
                    Some(player) => player,
                    None => break,
                },
            };
            let Some(black) = self.next_player().await else {
                debug!(player_id = white.id(), "Closing unmatched player");
                white.close();
                break;
            };

            if !white.is_connected() {
                debug!(player_id = white.id(), "Waiting player left before pairing");
                white.close();
                waiting = Some(black);
                continue;
            }
            waiting = self.start_session(white, black);
        }

        self.queue.close();
        while let Ok(player) = self.queue.try_recv() {
            player.close();
        }
        info!("Matchmaker stopped");
    }

    /// Next live player in arrival order. Players that disconnected while
    /// queued are closed and skipped.
    async fn next_player(&mut self) -> Option<Box<dyn Player>> {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => None,
                player = self.queue.recv() => player,
            };
            let player = next?;
            if player.is_connected() {
                return Some(player);
            }
            debug!(player_id = player.id(), "Skipping player that disconnected while queued");
            player.close();
        }
    }

    /// Start a session on its own task. Returns the player to re-queue at the
    /// front if the session could not start through no fault of theirs.
    fn start_session(
        &self,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
    ) -> Option<Box<dyn Player>> {
        let session_id = Uuid::new_v4();
        let white_id = white.id().to_string();
        let black_id = black.id().to_string();
        info!(
            session_id = %session_id,
            white = %white_id,
            black = %black_id,
            "Paired players"
        );

        let session = match Session::start(
            session_id,
            white,
            black,
            self.config,
            self.shutdown.child_token(),
        ) {
            Ok(session) => session,
            Err(mut failure) => {
                let survivor = failure.survivor.take();
                if let Some(player) = &survivor {
                    debug!(player_id = player.id(), "Returning player to the front of the queue");
                }
                self.report(SessionReport {
                    session_id,
                    white_id,
                    black_id,
                    result: Err(failure.into()),
                });
                return survivor;
            }
        };

        let reports = self.reports.clone();
        tokio::spawn(async move {
            let result = session.run().await;
            if let Err(e) = &result {
                warn!(session_id = %session_id, error = %e, "Session ended without a result");
            }
            if let Some(reports) = reports {
                let _ = reports.send(SessionReport {
                    session_id,
                    white_id,
                    black_id,
                    result,
                });
            }
        });
        None
    }

    fn report(&self, report: SessionReport) {
        warn!(session_id = %report.session_id, "Session failed to start");
        if let Some(reports) = &self.reports {
            let _ = reports.send(report);
        }
    }
}
