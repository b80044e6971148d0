//! Failure modes of a single client connection.

use std::io::ErrorKind;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::error::ProtocolError;

use crate::hardware::HardwareError;

/// Why a connection duty stopped. Every variant is fatal to the connection
/// that raised it and to nothing else.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// The peer closed the socket, cleanly or not
    Closed,
    Transport(String),
    Sensor(HardwareError),
    Serialize(String),
    /// A duty task panicked
    TaskFailed(String),
}

impl ConnectionError {
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ConnectionError::Closed)
    }
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::Closed => write!(f, "Connection closed by peer"),
            ConnectionError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ConnectionError::Sensor(e) => write!(f, "{}", e),
            ConnectionError::Serialize(msg) => write!(f, "Failed to serialize telemetry: {}", msg),
            ConnectionError::TaskFailed(msg) => write!(f, "Connection task failed: {}", msg),
        }
    }
}

impl std::error::Error for ConnectionError {}

impl From<WsError> for ConnectionError {
    fn from(error: WsError) -> Self {
        match error {
            WsError::ConnectionClosed | WsError::AlreadyClosed => ConnectionError::Closed,
            WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => ConnectionError::Closed,
            WsError::Io(ref e) if matches!(e.kind(), ErrorKind::ConnectionReset | ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof) => {
                ConnectionError::Closed
            }
            other => ConnectionError::Transport(other.to_string()),
        }
    }
}

impl From<HardwareError> for ConnectionError {
    fn from(error: HardwareError) -> Self {
        ConnectionError::Sensor(error)
    }
}
