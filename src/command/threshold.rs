//! Client-side threshold evaluation.
//!
//! Turns a reading into the status command a client sends back to the device,
//! and tells which side of its range an out-of-range reading falls on.
//! Defaults mirror the mobile client: thresholds off, 0..100 for temperature and
//! humidity, 0..1000 for pressure.

use serde::Deserialize;

use super::{Command, Metric, Status};
use crate::telemetry::SensorSample;

/// Inclusive acceptable range for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.breach(value).is_none()
    }

    /// Which side of the range a value falls on, `None` when inside.
    pub fn breach(&self, value: f64) -> Option<Breach> {
        if value < self.min {
            Some(Breach::Below)
        } else if value > self.max {
            Some(Breach::Above)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breach {
    Below,
    Above,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Thresholds {
    pub enabled: bool,
    pub temperature: Range,
    pub humidity: Range,
    pub pressure: Range,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            enabled: false,
            temperature: Range::new(0.0, 100.0),
            humidity: Range::new(0.0, 100.0),
            pressure: Range::new(0.0, 1000.0),
        }
    }
}

impl Thresholds {
    pub fn range(&self, metric: Metric) -> Range {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Pressure => self.pressure,
        }
    }

    pub fn classify(&self, metric: Metric, value: f64) -> Status {
        if !self.enabled {
            Status::ThresholdsDisabled
        } else if self.range(metric).contains(value) {
            Status::InThreshold
        } else {
            Status::OutOfThreshold
        }
    }

    /// Out-of-range side for one reading. Always `None` while thresholds are off.
    pub fn breach(&self, metric: Metric, value: f64) -> Option<Breach> {
        if self.enabled { self.range(metric).breach(value) } else { None }
    }

    /// Status command for one metric of a sample, value printed with two decimals.
    pub fn command_for(&self, metric: Metric, sample: &SensorSample) -> Command {
        let value = sample.value(metric);
        Command::new(metric, self.classify(metric, value), format!("{:.2}", value))
    }

    /// Check that every range is well formed.
    pub fn validate(&self) -> Result<(), String> {
        for metric in Metric::ALL {
            let range = self.range(metric);
            if !(range.min.is_finite() && range.max.is_finite()) {
                return Err(format!("{:?} threshold bounds must be finite", metric));
            }
            if range.min > range.max {
                return Err(format!("{:?} threshold min {} exceeds max {}", metric, range.min, range.max));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> Thresholds {
        Thresholds {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn disabled_thresholds_report_disabled() {
        let thresholds = Thresholds::default();
        for metric in Metric::ALL {
            assert_eq!(thresholds.classify(metric, 5000.0), Status::ThresholdsDisabled);
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let thresholds = enabled();
        assert_eq!(thresholds.classify(Metric::Temperature, 0.0), Status::InThreshold);
        assert_eq!(thresholds.classify(Metric::Temperature, 100.0), Status::InThreshold);
        assert_eq!(thresholds.classify(Metric::Temperature, -0.01), Status::OutOfThreshold);
        assert_eq!(thresholds.classify(Metric::Humidity, 100.01), Status::OutOfThreshold);
    }

    #[test]
    fn default_pressure_range_flags_normal_air_pressure() {
        assert_eq!(enabled().classify(Metric::Pressure, 1013.25), Status::OutOfThreshold);
    }

    #[test]
    fn command_for_single_metric() {
        let sample = SensorSample::new(21.4, 85.0, 1013.25);
        let thresholds = enabled();
        assert_eq!(thresholds.command_for(Metric::Temperature, &sample).to_string(), "TEMP_IN_THRESHOLD:21.40");
        assert_eq!(thresholds.command_for(Metric::Pressure, &sample).to_string(), "PRES_OUT_THRESHOLD:1013.25");
        assert_eq!(
            Thresholds::default().command_for(Metric::Humidity, &sample).to_string(),
            "HUM_THRESHOLDS_DISABLED:85.00"
        );
    }

    #[test]
    fn breach_reports_side() {
        let thresholds = enabled();
        assert_eq!(thresholds.breach(Metric::Temperature, -0.5), Some(Breach::Below));
        assert_eq!(thresholds.breach(Metric::Pressure, 1013.25), Some(Breach::Above));
        assert_eq!(thresholds.breach(Metric::Humidity, 100.0), None);
        assert_eq!(Thresholds::default().breach(Metric::Pressure, 5000.0), None);
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut thresholds = enabled();
        assert!(thresholds.validate().is_ok());
        thresholds.humidity = Range::new(80.0, 20.0);
        assert!(thresholds.validate().is_err());
    }
}
