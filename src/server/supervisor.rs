//! Connection supervisor.
//!
//! Splits a client socket, runs the telemetry publisher and the command
//! listener as two tasks, and tears both down as soon as either one stops.

use embassy_futures::select::{Either, select};
use futures::StreamExt;
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::{JoinError, JoinHandle};
use tokio_tungstenite::WebSocketStream;

use crate::command::listener;
use crate::connection::ConnectionError;
use crate::hardware::{EnvironmentSensor, SharedDevice, TextDisplay};
use crate::telemetry::publisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duty {
    Publisher,
    Listener,
}

impl fmt::Display for Duty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duty::Publisher => write!(f, "telemetry publisher"),
            Duty::Listener => write!(f, "command listener"),
        }
    }
}

/// How a session ended: which duty stopped first and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEnd {
    pub duty: Duty,
    pub reason: ConnectionError,
}

type DutyHandle = JoinHandle<Result<Infallible, ConnectionError>>;

fn reason(joined: Result<Result<Infallible, ConnectionError>, JoinError>) -> ConnectionError {
    match joined {
        Ok(Ok(never)) => match never {},
        Ok(Err(error)) => error,
        Err(join_error) => ConnectionError::TaskFailed(join_error.to_string()),
    }
}

/// Abort a duty that is still running and wait until it is gone.
async fn cancel(handle: DutyHandle) {
    handle.abort();
    let _ = handle.await;
}

/// Serve one client until its connection ends.
///
/// # Parameters
///
/// * `websocket` - Handshaken client connection
/// * `peer` - Client address, for logging
/// * `sensor` - Shared sensor, read by the publisher
/// * `display` - Shared display, driven by the listener
/// * `interval` - Telemetry publish interval
pub async fn handle<T, S, D>(
    websocket: WebSocketStream<T>,
    peer: SocketAddr,
    sensor: SharedDevice<S>,
    display: SharedDevice<D>,
    interval: Duration,
) -> SessionEnd
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: EnvironmentSensor,
    D: TextDisplay,
{
    log::info!("Client connected: {}", peer);

    let (sink, stream) = websocket.split();
    let mut publisher_task: DutyHandle = tokio::spawn(publisher::run(sink, sensor, interval));
    let mut listener_task: DutyHandle = tokio::spawn(listener::run(stream, display));

    let first = select(&mut publisher_task, &mut listener_task).await;
    let end = match first {
        Either::First(joined) => {
            cancel(listener_task).await;
            SessionEnd {
                duty: Duty::Publisher,
                reason: reason(joined),
            }
        }
        Either::Second(joined) => {
            cancel(publisher_task).await;
            SessionEnd {
                duty: Duty::Listener,
                reason: reason(joined),
            }
        }
    };

    if end.reason.is_disconnect() {
        log::info!("Client disconnected: {}", peer);
    } else {
        log::warn!("Client {}: {} stopped: {}", peer, end.duty, end.reason);
    }
    log::info!("Connection closed: {}", peer);

    end
}
