//! Dual countdown clock for one session.
//!
//! One task owns both remaining values. Each tick it first drains every toggle
//! already queued, then decrements the active side and publishes the new value
//! on that side's channel. Both channels close when either side reaches zero.

use crate::chess::Color;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub const DEFAULT_START_TICKS: u32 = 600;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);
const READING_BUFFER: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    pub start_ticks: u32,
    pub tick_interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_ticks: DEFAULT_START_TICKS,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Read ends of the two countdown sequences.
#[derive(Debug)]
pub struct ClockReadings {
    pub white: mpsc::Receiver<u32>,
    pub black: mpsc::Receiver<u32>,
}

/// Switches which side is ticking.
#[derive(Debug, Clone)]
pub struct ClockToggle {
    tx: mpsc::UnboundedSender<()>,
}

impl ClockToggle {
    /// Returns false once the clock has stopped.
    pub fn toggle(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

pub struct Clock {
    config: ClockConfig,
    active: Color,
    white: u32,
    black: u32,
    toggles: mpsc::UnboundedReceiver<()>,
    white_tx: mpsc::Sender<u32>,
    black_tx: mpsc::Sender<u32>,
    shutdown: CancellationToken,
}

impl Clock {
    /// Spawn the clock task. White is active first.
    pub fn start(
        config: ClockConfig,
        shutdown: CancellationToken,
    ) -> (ClockToggle, ClockReadings, JoinHandle<()>) {
        let (toggle_tx, toggles) = mpsc::unbounded_channel();
        let (white_tx, white) = mpsc::channel(READING_BUFFER);
        let (black_tx, black) = mpsc::channel(READING_BUFFER);

        let clock = Clock {
            config,
            active: Color::White,
            white: config.start_ticks,
            black: config.start_ticks,
            toggles,
            white_tx,
            black_tx,
            shutdown,
        };
        let handle = tokio::spawn(clock.run());

        (
            ClockToggle { tx: toggle_tx },
            ClockReadings { white, black },
            handle,
        )
    }

    async fn run(mut self) {
        let period = self.config.tick_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    debug!("Clock cancelled");
                    break;
                }
                toggle = self.toggles.recv() => match toggle {
                    Some(()) => self.flip(),
                    None => {
                        debug!("Clock toggle handle dropped, stopping");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if !self.tick().await {
                        break;
                    }
                }
            }
        }
        // Dropping the senders closes both sequences
    }

    fn flip(&mut self) {
        self.active = self.active.opposite();
        trace!(active = %self.active, "Clock toggled");
    }

    /// Decrement the active side. Returns false when the clock must stop.
    async fn tick(&mut self) -> bool {
        while let Ok(()) = self.toggles.try_recv() {
            self.flip();
        }

        let (remaining, tx) = match self.active {
            Color::White => (&mut self.white, &self.white_tx),
            Color::Black => (&mut self.black, &self.black_tx),
        };
        *remaining = remaining.saturating_sub(1);
        let value = *remaining;
        trace!(side = %self.active, remaining = value, "Clock tick");

        let delivered = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => false,
            sent = tx.send(value) => sent.is_ok(),
        };
        if value == 0 {
            debug!(side = %self.active, "Clock reached zero");
            return false;
        }
        delivered
    }
}
