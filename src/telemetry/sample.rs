use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};
use std::io;

use crate::command::Metric;
use crate::hardware::{EnvironmentSensor, HardwareError};

/// Round to two decimal places, the precision of every published value.
///
/// Rounds the exact binary value, with exact ties going to the even digit:
/// `1013.125` becomes `1013.12`, `23.456` becomes `23.46`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Compact JSON with a space after every `:` and `,`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// One set of readings, rounded at capture time.
///
/// Field order is the wire key order: `temperature`, `humidity`, `pressure`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl SensorSample {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature: round2(temperature),
            humidity: round2(humidity),
            pressure: round2(pressure),
        }
    }

    /// Read all three quantities from the sensor.
    ///
    /// Non-finite readings are rejected, they have no JSON number form.
    pub fn capture<S: EnvironmentSensor + ?Sized>(sensor: &mut S) -> Result<Self, HardwareError> {
        let temperature = finite("temperature", sensor.read_temperature()?)?;
        let humidity = finite("humidity", sensor.read_humidity()?)?;
        let pressure = finite("pressure", sensor.read_pressure()?)?;
        Ok(Self::new(temperature, humidity, pressure))
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Pressure => self.pressure,
        }
    }

    /// Flat JSON record as sent to clients:
    /// `{"temperature": 23.46, "humidity": 40.0, "pressure": 1010.0}`
    pub fn to_record(&self) -> Result<String, serde_json::Error> {
        let mut record = Vec::with_capacity(64);
        self.serialize(&mut Serializer::with_formatter(&mut record, SpacedFormatter))?;
        String::from_utf8(record).map_err(serde_json::Error::custom)
    }

    pub fn from_record(record: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(record)
    }
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, HardwareError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HardwareError::InvalidReading { quantity, value })
    }
}
