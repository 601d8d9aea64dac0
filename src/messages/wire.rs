use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, instrument, trace, warn};

// Wire protocol constants
pub const LENGTH_PREFIX_SIZE: usize = 4; // 4 bytes for u32 length prefix
pub const MIN_MESSAGE_SIZE: usize = 1;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024; // a full state snapshot is well under 2KB
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Size limits and timeouts for framed text messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireConfig {
    pub max_message_size: usize,
    /// Applies to the handshake frame only; game reads wait indefinitely.
    pub handshake_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

#[derive(Error, Debug)]
pub enum WireProtocolError {
    #[error("Message too large: {size} bytes exceeds maximum of {max_size} bytes")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Message too small: {size} bytes is below minimum of {min_size} bytes")]
    MessageTooSmall { size: usize, min_size: usize },

    #[error("Read operation timed out after {timeout:?}")]
    ReadTimeout { timeout: Duration },

    #[error("Write operation timed out after {timeout:?}")]
    WriteTimeout { timeout: Duration },

    #[error("Corrupted data: {reason}")]
    CorruptedData { reason: String },

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Length-prefixed UTF-8 text frames: 4-byte big-endian length, then the bytes.
#[derive(Debug, Clone, Default)]
pub struct FramedText {
    config: WireConfig,
}

impl FramedText {
    pub fn new(config: WireConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    fn validate_length(&self, size: usize) -> Result<(), WireProtocolError> {
        if size < MIN_MESSAGE_SIZE {
            warn!(size = size, "Message size is below minimum threshold");
            return Err(WireProtocolError::MessageTooSmall {
                size,
                min_size: MIN_MESSAGE_SIZE,
            });
        }
        if size > self.config.max_message_size {
            error!(
                size = size,
                max_size = self.config.max_message_size,
                "Message size exceeds maximum allowed size"
            );
            return Err(WireProtocolError::MessageTooLarge {
                size,
                max_size: self.config.max_message_size,
            });
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self, writer, text), fields(len = text.len()))]
    pub async fn write_text(
        &self,
        writer: &mut (impl AsyncWrite + Unpin),
        text: &str,
    ) -> Result<(), WireProtocolError> {
        self.validate_length(text.len())?;

        let length_prefix = (text.len() as u32).to_be_bytes();
        writer.write_all(&length_prefix).await?;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;

        trace!("Wrote {} byte frame", text.len());
        Ok(())
    }

    /// Read one frame. A clean EOF before the length prefix is `ConnectionClosed`.
    #[instrument(level = "trace", skip(self, reader))]
    pub async fn read_text(
        &self,
        reader: &mut (impl AsyncRead + Unpin),
    ) -> Result<String, WireProtocolError> {
        let mut length_buffer = [0u8; LENGTH_PREFIX_SIZE];
        match reader.read_exact(&mut length_buffer).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(WireProtocolError::ConnectionClosed);
            }
            Err(e) => return Err(e.into()),
        }

        let length = u32::from_be_bytes(length_buffer) as usize;
        self.validate_length(length)?;

        let mut buffer = vec![0u8; length];
        reader.read_exact(&mut buffer).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                WireProtocolError::CorruptedData {
                    reason: format!("stream ended inside a {} byte frame", length),
                }
            } else {
                e.into()
            }
        })?;

        let text = String::from_utf8(buffer).map_err(|e| WireProtocolError::CorruptedData {
            reason: format!("frame is not UTF-8: {}", e),
        })?;
        debug!("Read {} byte frame", length);
        Ok(text)
    }

    pub async fn read_text_with_timeout(
        &self,
        reader: &mut (impl AsyncRead + Unpin),
        timeout: Duration,
    ) -> Result<String, WireProtocolError> {
        match tokio::time::timeout(timeout, self.read_text(reader)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                error!(timeout = ?timeout, "Read operation timed out");
                Err(WireProtocolError::ReadTimeout { timeout })
            }
        }
    }

    pub async fn write_text_with_timeout(
        &self,
        writer: &mut (impl AsyncWrite + Unpin),
        text: &str,
    ) -> Result<(), WireProtocolError> {
        let timeout = self.config.write_timeout;
        match tokio::time::timeout(timeout, self.write_text(writer, text)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                error!(timeout = ?timeout, "Write operation timed out");
                Err(WireProtocolError::WriteTimeout { timeout })
            }
        }
    }
}
