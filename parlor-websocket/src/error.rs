//! Error types for chat client operations.

use std::time::Duration;
use thiserror::Error;

/// Chat client error type.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Connection-level failure reported by the WebSocket stack
    #[error("Transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// The connection handshake did not finish in time
    #[error("Connection attempt timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Inbound frame that is not valid JSON or has the wrong shape
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Inbound frame with a `type` the client does not handle
    #[error("Unknown message type: {0}")]
    UnknownEventType(String),

    /// Server URL that cannot carry a room path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Outbound message that is blank after trimming
    #[error("Message is empty")]
    EmptyMessage,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,
}

impl ChatError {
    /// Whether this error belongs to the connection itself rather than to a
    /// single frame. Transport errors are recovered by reconnecting.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Transport(_) | ChatError::ConnectTimeout(_) | ChatError::ConnectionClosed
        )
    }
}

/// Result type for chat client operations.
pub type ChatResult<T> = Result<T, ChatError>;
