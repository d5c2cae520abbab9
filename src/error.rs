//! Session failure taxonomy
//!
//! Every variant is handled locally by logging and recording a transcript
//! event; none is retried and none is fatal to the host process.

use thiserror::Error;

/// Failures a session can observe on its transport
#[derive(Debug, Error)]
pub enum SessionError {
    /// The initial connection or handshake failed
    #[error("connection failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    /// An outbound frame could not be sent
    #[error("send failed: {0}")]
    Send(#[source] tokio_tungstenite::tungstenite::Error),

    /// The transport reported a mid-stream failure
    #[error("transport error: {0}")]
    Transport(#[source] tokio_tungstenite::tungstenite::Error),
}

impl SessionError {
    /// The transcript-level classification of this error
    pub fn kind(&self) -> crate::event::ErrorKind {
        match self {
            SessionError::Connect(_) => crate::event::ErrorKind::Connect,
            SessionError::Send(_) => crate::event::ErrorKind::Send,
            SessionError::Transport(_) => crate::event::ErrorKind::Transport,
        }
    }
}
