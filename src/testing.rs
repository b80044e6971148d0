//! Test doubles shared by the unit tests.

use futures::channel::mpsc::SendError;
use tokio::io::DuplexStream;
use tokio_tungstenite::{WebSocketStream, accept_async, client_async};

use crate::connection::ConnectionError;
use crate::hardware::{EnvironmentSensor, HardwareError, Rgb, TextDisplay};

/// Sensor returning the same readings forever, or failing every read.
pub struct FixedSensor {
    readings: Option<(f64, f64, f64)>,
}

impl FixedSensor {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            readings: Some((temperature, humidity, pressure)),
        }
    }

    pub fn failing() -> Self {
        Self { readings: None }
    }

    fn reading(&self, pick: fn((f64, f64, f64)) -> f64) -> Result<f64, HardwareError> {
        self.readings
            .map(pick)
            .ok_or_else(|| HardwareError::ReadFailed("i2c bus not responding".to_string()))
    }
}

impl EnvironmentSensor for FixedSensor {
    fn read_temperature(&mut self) -> Result<f64, HardwareError> {
        self.reading(|r| r.0)
    }

    fn read_humidity(&mut self) -> Result<f64, HardwareError> {
        self.reading(|r| r.1)
    }

    fn read_pressure(&mut self) -> Result<f64, HardwareError> {
        self.reading(|r| r.2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Show { text: String, foreground: Rgb, background: Rgb },
    Clear,
}

impl DisplayEvent {
    pub fn show(text: &str, foreground: Rgb, background: Rgb) -> Self {
        DisplayEvent::Show {
            text: text.to_string(),
            foreground,
            background,
        }
    }
}

/// Display that records every call. A failing display rejects every call.
#[derive(Default)]
pub struct RecordingDisplay {
    pub events: Vec<DisplayEvent>,
    fail: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { events: Vec::new(), fail: true }
    }
}

impl TextDisplay for RecordingDisplay {
    fn show_message(&mut self, text: &str, foreground: Rgb, background: Rgb) -> Result<(), HardwareError> {
        if self.fail {
            return Err(HardwareError::WriteFailed("matrix offline".to_string()));
        }
        self.events.push(DisplayEvent::show(text, foreground, background));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HardwareError> {
        if self.fail {
            return Err(HardwareError::WriteFailed("matrix offline".to_string()));
        }
        self.events.push(DisplayEvent::Clear);
        Ok(())
    }
}

impl From<SendError> for ConnectionError {
    fn from(error: SendError) -> Self {
        if error.is_disconnected() {
            ConnectionError::Closed
        } else {
            ConnectionError::Transport(error.to_string())
        }
    }
}

/// Server and client ends of an in-memory WebSocket connection.
pub async fn ws_pair() -> (WebSocketStream<DuplexStream>, WebSocketStream<DuplexStream>) {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let (server, client) = tokio::join!(accept_async(server_io), client_async("ws://localhost/", client_io));
    (server.expect("server handshake"), client.expect("client handshake").0)
}
