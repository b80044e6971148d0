//! Out-of-range alerts for clients.
//!
//! A reading outside its threshold range raises an alert naming the side it
//! fell on. Each metric then stays quiet for a cooldown period so a reading
//! that stays out of range does not alert on every record.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use super::{Breach, Metric, Thresholds};
use crate::telemetry::SensorSample;

/// Quiet period per metric after an alert.
pub const ALERT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert {
    pub metric: Metric,
    pub breach: Breach,
    pub value: f64,
}

/// e.g. `Humidity Above Threshold: Humidity is above threshold! (85.00)`
impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (title, side) = match self.breach {
            Breach::Below => ("Below", "below"),
            Breach::Above => ("Above", "above"),
        };
        let name = self.metric.name();
        write!(f, "{} {} Threshold: {} is {} threshold! ({:.2})", name, title, name, side, self.value)
    }
}

/// Tracks when each metric last alerted.
pub struct AlertGate {
    cooldown: Duration,
    last_raised: [Option<Instant>; 3],
}

impl AlertGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_raised: [None; 3],
        }
    }

    /// Alerts due for this sample. A metric in cooldown is skipped even if out of range.
    pub fn check(&mut self, thresholds: &Thresholds, sample: &SensorSample) -> Vec<Alert> {
        let now = Instant::now();
        let mut alerts = Vec::new();

        for metric in Metric::ALL {
            let last = &mut self.last_raised[metric as usize];
            if last.is_some_and(|at| now.duration_since(at) < self.cooldown) {
                continue;
            }

            let value = sample.value(metric);
            if let Some(breach) = thresholds.breach(metric, value) {
                *last = Some(now);
                alerts.push(Alert { metric, breach, value });
            }
        }

        alerts
    }
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(ALERT_COOLDOWN)
    }
}
