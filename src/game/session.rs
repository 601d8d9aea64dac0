//! Per-game event loop.
//!
//! The loop is the only writer of its [`State`]. It waits on, in priority
//! order: shutdown, White's clock, Black's clock, White's inbound queue,
//! Black's inbound queue. A clock timeout that is ready at the same time as a
//! move therefore wins.

use super::clock::{Clock, ClockConfig, ClockToggle};
use super::error::{SessionError, TransportError};
use super::outcome::{EndReason, GameOutcome};
use super::player::{Player, PlayerEvent};
use crate::chess::{Board, Color, Move};
use crate::messages::{Inbound, Outbound};
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub clock: ClockConfig,
}

/// Authoritative game state, owned by exactly one session.
#[derive(Debug)]
pub struct State {
    pub sequence_number: i64,
    pub board: Board,
    pub white_clock: mpsc::Receiver<u32>,
    pub black_clock: mpsc::Receiver<u32>,
}

impl State {
    pub fn snapshot(&self) -> Outbound {
        Outbound::State {
            sequence_number: self.sequence_number,
            board: self.board.clone(),
        }
    }
}

enum Event {
    Shutdown,
    Tick(Color, u32),
    Player(Color, Option<PlayerEvent>),
}

/// A session that never got going.
pub struct StartFailure {
    pub error: TransportError,
    /// The player who was not yet told about the session, if any.
    pub survivor: Option<Box<dyn Player>>,
}

impl fmt::Debug for StartFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartFailure")
            .field("error", &self.error)
            .field("survivor", &self.survivor.as_ref().map(|p| p.id()))
            .finish()
    }
}

impl From<StartFailure> for SessionError {
    fn from(failure: StartFailure) -> Self {
        SessionError::StartFailed(failure.error)
    }
}

pub struct Session {
    id: Uuid,
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    state: State,
    turn: Color,
    toggle: ClockToggle,
    clock_task: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl Session {
    /// Send the start notifications and start the clock.
    ///
    /// White is notified first. If White's notification cannot be queued,
    /// Black has been told nothing and comes back as the survivor. If only
    /// Black's fails, White already saw `StartWhite` and is told it won by
    /// disconnect. The failed player is always closed.
    pub fn start(
        id: Uuid,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
        config: SessionConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, StartFailure> {
        if let Err(error) = white.notify(&Outbound::Start(Color::White)) {
            warn!(session_id = %id, player_id = white.id(), error = %error, "Start notification failed");
            white.close();
            return Err(StartFailure {
                error,
                survivor: Some(black),
            });
        }
        if let Err(error) = black.notify(&Outbound::Start(Color::Black)) {
            warn!(session_id = %id, player_id = black.id(), error = %error, "Start notification failed");
            let _ = white.notify(&Outbound::GameOver {
                winner: Color::White,
                reason: EndReason::Disconnect,
            });
            white.close();
            black.close();
            return Err(StartFailure {
                error,
                survivor: None,
            });
        }

        let (toggle, readings, clock_task) = Clock::start(config.clock, shutdown.clone());
        info!(
            session_id = %id,
            white = white.id(),
            black = black.id(),
            "Session started"
        );

        Ok(Self {
            id,
            white,
            black,
            state: State {
                sequence_number: 0,
                board: Board::new(),
                white_clock: readings.white,
                black_clock: readings.black,
            },
            turn: Color::White,
            toggle,
            clock_task,
            shutdown,
        })
    }

    /// Drive the game until a terminal event, then tear everything down.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn run(mut self) -> Result<GameOutcome, SessionError> {
        let result = loop {
            let event = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => Event::Shutdown,
                Some(remaining) = self.state.white_clock.recv() => Event::Tick(Color::White, remaining),
                Some(remaining) = self.state.black_clock.recv() => Event::Tick(Color::Black, remaining),
                event = self.white.inbound().recv() => Event::Player(Color::White, event),
                event = self.black.inbound().recv() => Event::Player(Color::Black, event),
            };

            match event {
                Event::Shutdown => {
                    info!("Session cancelled");
                    break Err(SessionError::Cancelled);
                }
                Event::Tick(side, 0) => {
                    info!(side = %side, "Clock ran out");
                    break Ok(GameOutcome::against(side, EndReason::Timeout));
                }
                Event::Tick(side, remaining) => {
                    trace!(side = %side, remaining, "Clock tick");
                }
                Event::Player(color, None) => {
                    info!(side = %color, "Player connection closed");
                    break Ok(GameOutcome::against(color, EndReason::Disconnect));
                }
                Event::Player(color, Some(PlayerEvent::Disconnected(e))) => {
                    warn!(side = %color, error = %e, "Player transport failed");
                    break Ok(GameOutcome::against(color, EndReason::Disconnect));
                }
                Event::Player(color, Some(PlayerEvent::Message(text))) => {
                    if let Some(outcome) = self.handle_message(color, &text) {
                        break Ok(outcome);
                    }
                }
            }
        };

        if let Ok(outcome) = &result {
            info!(
                winner = %outcome.winner,
                loser = %outcome.loser(),
                reason = %outcome.reason,
                "Session over"
            );
            let message = Outbound::GameOver {
                winner: outcome.winner,
                reason: outcome.reason,
            };
            self.notify(Color::White, &message);
            self.notify(Color::Black, &message);
        }
        self.teardown().await;
        result
    }

    fn handle_message(&mut self, color: Color, text: &str) -> Option<GameOutcome> {
        let parsed = Inbound::parse(text);
        debug!(side = %color, text, "Inbound message");

        if let Ok(Inbound::Resign) = parsed {
            info!(side = %color, "Player resigned");
            return Some(GameOutcome::against(color, EndReason::Resign));
        }

        if color != self.turn {
            debug!(side = %color, turn = %self.turn, "Message out of turn");
            self.notify(color, &Outbound::NotYourTurn);
            self.send_state(color);
            return None;
        }

        match parsed {
            Err(e) => {
                debug!(side = %color, error = %e, token = ?e.position(), "Malformed move");
                self.notify(color, &Outbound::InvalidMoveFormat);
                None
            }
            Ok(Inbound::NeedState) => {
                self.send_state(color);
                None
            }
            Ok(Inbound::Move(m)) => self.play(color, m),
            Ok(Inbound::Resign) => None,
        }
    }

    fn play(&mut self, color: Color, m: Move) -> Option<GameOutcome> {
        let outcome = match m.apply(&mut self.state.board, color, self.state.sequence_number) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                debug!(side = %color, seq = m.sequence_number, reason = %rejection, "Move rejected");
                self.send_state(color);
                return None;
            }
        };

        self.state.sequence_number += 1;
        self.turn = color.opposite();
        if !self.toggle.toggle() {
            warn!("Clock stopped before toggle");
        }
        debug!(side = %color, seq = self.state.sequence_number, mv = %m, "Move accepted");

        self.notify(
            color.opposite(),
            &Outbound::OtherMove {
                source: m.source,
                dest: m.dest,
            },
        );
        self.notify(
            color,
            &Outbound::MoveAck {
                source: m.source,
                dest: m.dest,
            },
        );

        outcome.winner.map(|winner| GameOutcome {
            winner,
            reason: EndReason::Board,
        })
    }

    fn player(&self, color: Color) -> &dyn Player {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    fn send_state(&self, color: Color) {
        self.notify(color, &self.state.snapshot());
    }

    /// Best-effort; a dead sink shows up as a disconnect on the inbound side.
    fn notify(&self, color: Color, message: &Outbound) {
        let player = self.player(color);
        if let Err(e) = player.notify(message) {
            warn!(
                player_id = player.id(),
                message = message.message_type(),
                error = %e,
                "Dropped outbound message"
            );
        }
    }

    async fn teardown(self) {
        self.shutdown.cancel();
        self.white.close();
        self.black.close();
        if let Err(e) = self.clock_task.await {
            warn!(error = %e, "Clock task did not stop cleanly");
        }
        debug!("Session torn down");
    }

    #[cfg(test)]
    fn turn(&self) -> Color {
        self.turn
    }
}
