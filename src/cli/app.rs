use crate::game::{ClockConfig, SessionConfig, DEFAULT_MOVE_QUEUE_CAPACITY};
use crate::messages::{
    WireConfig, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_WRITE_TIMEOUT,
    MAX_STATE_SNAPSHOT_LEN,
};
use crate::network::{ServerSettings, DEFAULT_AUTH_TOKEN};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the server listens on
    pub bind_addr: String,
    /// First word every client must send in its handshake frame
    pub auth_token: String,
    /// Starting clock value per side
    pub clock_start_ticks: u32,
    /// Length of one clock tick in milliseconds
    pub tick_interval_ms: u64,
    /// Unread moves a player may have queued before its reader blocks
    pub move_queue_capacity: usize,
    pub max_message_size: usize,
    pub handshake_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let clock = ClockConfig::default();
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            clock_start_ticks: clock.start_ticks,
            tick_interval_ms: clock.tick_interval.as_millis() as u64,
            move_queue_capacity: DEFAULT_MOVE_QUEUE_CAPACITY,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            handshake_timeout_secs: DEFAULT_HANDSHAKE_TIMEOUT.as_secs(),
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("dev", "duel", "duel")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Get the default config file path
    pub fn default_config_file() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        let config_file = Self::default_config_file()?;
        Self::load_or_create(&config_file)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).context("Failed to parse configuration file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).context("Failed to write configuration file")?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Apply command-line overrides and re-check the result.
    pub fn apply_overrides(&mut self, bind: Option<&str>, clock_ticks: Option<u32>) -> Result<()> {
        if let Some(bind) = bind {
            self.bind_addr = bind.to_string();
        }
        if let Some(ticks) = clock_ticks {
            self.clock_start_ticks = ticks;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.clock_start_ticks == 0 {
            anyhow::bail!("clock_start_ticks must be greater than zero");
        }
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be greater than zero");
        }
        if self.move_queue_capacity == 0 {
            anyhow::bail!("move_queue_capacity must be greater than zero");
        }
        // Every needState reply has to fit in one frame
        if self.max_message_size < MAX_STATE_SNAPSHOT_LEN {
            anyhow::bail!(
                "max_message_size must be at least {} bytes to carry a board snapshot",
                MAX_STATE_SNAPSHOT_LEN
            );
        }
        if self.auth_token.split_whitespace().count() != 1 {
            anyhow::bail!("auth_token must be a single word");
        }
        Ok(())
    }

    pub fn clock(&self) -> ClockConfig {
        ClockConfig {
            start_ticks: self.clock_start_ticks,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            clock: self.clock(),
        }
    }

    pub fn wire(&self) -> WireConfig {
        WireConfig {
            max_message_size: self.max_message_size,
            handshake_timeout: Duration::from_secs(self.handshake_timeout_secs),
            write_timeout: Duration::from_secs(self.write_timeout_secs),
        }
    }

    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            auth_token: self.auth_token.clone(),
            wire: self.wire(),
            move_queue_capacity: self.move_queue_capacity,
        }
    }
}
