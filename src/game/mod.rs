pub mod clock;
pub mod error;
pub mod matchmaker;
pub mod outcome;
pub mod player;
pub mod session;

pub use clock::{Clock, ClockConfig, ClockReadings, ClockToggle};
pub use error::{MatchmakerError, SessionError, TransportError};
pub use matchmaker::{Matchmaker, MatchmakerHandle, SessionReport};
pub use outcome::{EndReason, GameOutcome};
pub use player::{ChannelPlayer, Player, PlayerEvent, PlayerPeer, DEFAULT_MOVE_QUEUE_CAPACITY};
pub use session::{Session, SessionConfig, StartFailure, State};
