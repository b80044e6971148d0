//! Inbound command grammar and the display-driving listener duty.
//!
//! ## Module Organization
//!
//! - `parser`: `METRIC_STATUS:value` grammar, parsing and encoding
//! - `style`: colour pair for each threshold status
//! - `listener`: per-connection duty that renders commands on the display
//! - `threshold`: client-side classification of readings into a status
//! - `alert`: rate-limited out-of-range alerts for clients

pub mod alert;
pub mod listener;
pub mod parser;
pub mod style;
pub mod threshold;

pub use alert::{ALERT_COOLDOWN, Alert, AlertGate};
pub use parser::{Command, Metric, Status, parse_command};
pub use style::DisplayStyle;
pub use threshold::{Breach, Range, Thresholds};
