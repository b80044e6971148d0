//! Hardware abstraction for the sensor board and the LED display.
//!
//! The server never talks to a driver directly. Each connection gets a
//! [`SharedDevice`] handle to the sensor and the display, so real drivers and
//! simulated ones are interchangeable.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use std::sync::Arc;

pub mod simulated;

pub use simulated::{LogDisplay, SimulatedSensor};

/// 24-bit colour as sent to the LED matrix.
pub type Rgb = [u8; 3];

pub const RED: Rgb = [255, 0, 0];
pub const GREEN: Rgb = [0, 255, 0];
pub const BLUE: Rgb = [0, 0, 80];
pub const GREY: Rgb = [128, 128, 128];

/// Device handle shared between connections.
///
/// The lock is taken per driver call. A render and the following clear are two
/// separate critical sections, so two clients can still interleave on the matrix.
pub type SharedDevice<T> = Arc<Mutex<CriticalSectionRawMutex, T>>;

pub fn share<T>(device: T) -> SharedDevice<T> {
    Arc::new(Mutex::new(device))
}

#[derive(Debug, Clone, PartialEq)]
pub enum HardwareError {
    ReadFailed(String),
    InvalidReading { quantity: &'static str, value: f64 },
    WriteFailed(String),
}

impl std::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardwareError::ReadFailed(msg) => write!(f, "Sensor read failed: {}", msg),
            HardwareError::InvalidReading { quantity, value } => write!(f, "Invalid {} reading: {}", quantity, value),
            HardwareError::WriteFailed(msg) => write!(f, "Display write failed: {}", msg),
        }
    }
}

impl std::error::Error for HardwareError {}

/// Temperature, humidity and pressure sensor.
pub trait EnvironmentSensor: Send + 'static {
    /// Temperature in degrees Celsius
    fn read_temperature(&mut self) -> Result<f64, HardwareError>;

    /// Relative humidity in percent
    fn read_humidity(&mut self) -> Result<f64, HardwareError>;

    /// Pressure in hectopascal
    fn read_pressure(&mut self) -> Result<f64, HardwareError>;
}

/// Text-capable display such as an 8x8 LED matrix.
pub trait TextDisplay: Send + 'static {
    /// Render (scroll) a text message. Returns once the message has been shown.
    fn show_message(&mut self, text: &str, foreground: Rgb, background: Rgb) -> Result<(), HardwareError>;

    /// Turn every pixel off
    fn clear(&mut self) -> Result<(), HardwareError>;
}
