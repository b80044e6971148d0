//! Outbound telemetry: sample capture, record format and the per-connection publisher.

pub mod publisher;
pub mod sample;

pub use sample::{SensorSample, round2};
