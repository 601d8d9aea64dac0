pub mod app;
pub mod commands;

pub use app::Config;
pub use commands::{Cli, Commands, ConfigCommand};
