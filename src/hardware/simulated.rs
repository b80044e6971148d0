//! Host-side stand-ins for the sensor board and the LED matrix.
//!
//! `SimulatedSensor` produces a slow random walk around configurable baselines
//! with Gaussian measurement noise on top. `LogDisplay` writes every frame to the
//! log instead of lighting pixels.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::Deserialize;

use super::{EnvironmentSensor, HardwareError, Rgb, TextDisplay};

/// Parameters of the simulated sensor, read from the `[sensor]` config table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimulatedSensorConfig {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Standard deviation of the per-read measurement noise
    pub noise_std_dev: f64,
    /// Standard deviation of the random-walk step applied on every read
    pub drift_std_dev: f64,
    /// Fixed seed for reproducible readings; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SimulatedSensorConfig {
    fn default() -> Self {
        Self {
            temperature: 22.0,
            humidity: 45.0,
            pressure: 1013.25,
            noise_std_dev: 0.05,
            drift_std_dev: 0.02,
            seed: None,
        }
    }
}

/// One simulated quantity: baseline plus accumulated drift.
#[derive(Debug, Clone)]
struct Channel {
    baseline: f64,
    drift: f64,
}

pub struct SimulatedSensor {
    rng: StdRng,
    temperature: Channel,
    humidity: Channel,
    pressure: Channel,
    noise_std_dev: f64,
    drift_std_dev: f64,
}

impl SimulatedSensor {
    pub fn new(config: &SimulatedSensorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let channel = |baseline| Channel { baseline, drift: 0.0 };

        Self {
            rng,
            temperature: channel(config.temperature),
            humidity: channel(config.humidity),
            pressure: channel(config.pressure),
            noise_std_dev: config.noise_std_dev,
            drift_std_dev: config.drift_std_dev,
        }
    }
}

impl Channel {
    /// Advance the random walk by one step and return a noisy reading.
    fn step(&mut self, rng: &mut StdRng, drift_std_dev: f64, noise_std_dev: f64) -> f64 {
        self.drift += gaussian(rng, drift_std_dev);
        self.baseline + self.drift + gaussian(rng, noise_std_dev)
    }
}

fn gaussian(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    let n: f64 = rng.sample(StandardNormal);
    n * std_dev
}

impl EnvironmentSensor for SimulatedSensor {
    fn read_temperature(&mut self) -> Result<f64, HardwareError> {
        Ok(self.temperature.step(&mut self.rng, self.drift_std_dev, self.noise_std_dev))
    }

    fn read_humidity(&mut self) -> Result<f64, HardwareError> {
        let humidity = self.humidity.step(&mut self.rng, self.drift_std_dev, self.noise_std_dev);
        Ok(humidity.clamp(0.0, 100.0))
    }

    fn read_pressure(&mut self) -> Result<f64, HardwareError> {
        Ok(self.pressure.step(&mut self.rng, self.drift_std_dev, self.noise_std_dev))
    }
}

/// What the matrix currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub text: String,
    pub foreground: Rgb,
    pub background: Rgb,
}

/// Display that logs frames instead of driving LEDs.
#[derive(Debug, Default)]
pub struct LogDisplay {
    current: Option<Frame>,
    shown: u64,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame left on the matrix, `None` when blank
    pub fn current(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// Number of messages rendered since start-up
    pub fn shown(&self) -> u64 {
        self.shown
    }
}

impl TextDisplay for LogDisplay {
    fn show_message(&mut self, text: &str, foreground: Rgb, background: Rgb) -> Result<(), HardwareError> {
        log::info!("[MATRIX] \"{}\" fg {:?} bg {:?}", text, foreground, background);
        self.current = Some(Frame {
            text: text.to_string(),
            foreground,
            background,
        });
        self.shown += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HardwareError> {
        log::debug!("[MATRIX] clear");
        self.current = None;
        Ok(())
    }
}
