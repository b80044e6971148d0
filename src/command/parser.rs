//! Parse status commands sent by clients.
//!
//! Grammar:
//!
//! ```text
//! command := metric "_" status ":" value
//! metric  := "TEMP" | "HUM" | "PRES"
//! status  := "IN_THRESHOLD" | "OUT_THRESHOLD" | "THRESHOLDS_DISABLED"
//! value   := any text, kept verbatim
//! ```
//!
//! Example: `TEMP_IN_THRESHOLD:23.5`

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Pressure];

    pub fn wire_tag(self) -> &'static str {
        match self {
            Metric::Temperature => "TEMP",
            Metric::Humidity => "HUM",
            Metric::Pressure => "PRES",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Pressure => "Pressure",
        }
    }

    /// Look a metric up by its name or wire tag, ignoring case.
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|metric| name.eq_ignore_ascii_case(metric.name()) || name.eq_ignore_ascii_case(metric.wire_tag()))
    }

    /// Suffix appended to the value on the display, leading space included.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => " C",
            Metric::Humidity => " %",
            Metric::Pressure => " hPa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    InThreshold,
    OutOfThreshold,
    ThresholdsDisabled,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::InThreshold, Status::OutOfThreshold, Status::ThresholdsDisabled];

    pub fn wire_tag(self) -> &'static str {
        match self {
            Status::InThreshold => "IN_THRESHOLD",
            Status::OutOfThreshold => "OUT_THRESHOLD",
            Status::ThresholdsDisabled => "THRESHOLDS_DISABLED",
        }
    }
}

/// A parsed status command. `value` is the text after the first `:`, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub metric: Metric,
    pub status: Status,
    pub value: String,
}

impl Command {
    pub fn new(metric: Metric, status: Status, value: impl Into<String>) -> Self {
        Self {
            metric,
            status,
            value: value.into(),
        }
    }

    /// Text rendered on the display: value followed by the metric's unit.
    pub fn display_text(&self) -> String {
        format!("{}{}", self.value, self.metric.unit())
    }
}

/// Wire form, e.g. `HUM_OUT_THRESHOLD:85`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}:{}", self.metric.wire_tag(), self.status.wire_tag(), self.value)
    }
}

/// Recognised prefixes in match order: temperature, humidity, pressure, each
/// in-threshold, out-of-threshold, disabled.
const PREFIXES: [(&str, Metric, Status); 9] = [
    ("TEMP_IN_THRESHOLD:", Metric::Temperature, Status::InThreshold),
    ("TEMP_OUT_THRESHOLD:", Metric::Temperature, Status::OutOfThreshold),
    ("TEMP_THRESHOLDS_DISABLED:", Metric::Temperature, Status::ThresholdsDisabled),
    ("HUM_IN_THRESHOLD:", Metric::Humidity, Status::InThreshold),
    ("HUM_OUT_THRESHOLD:", Metric::Humidity, Status::OutOfThreshold),
    ("HUM_THRESHOLDS_DISABLED:", Metric::Humidity, Status::ThresholdsDisabled),
    ("PRES_IN_THRESHOLD:", Metric::Pressure, Status::InThreshold),
    ("PRES_OUT_THRESHOLD:", Metric::Pressure, Status::OutOfThreshold),
    ("PRES_THRESHOLDS_DISABLED:", Metric::Pressure, Status::ThresholdsDisabled),
];

/// Parse an inbound text message.
///
/// # Returns
///
/// `Some(command)` for the first matching prefix, `None` when no prefix matches.
pub fn parse_command(message: &str) -> Option<Command> {
    PREFIXES.iter().find_map(|(prefix, metric, status)| {
        message
            .strip_prefix(prefix)
            .map(|value| Command::new(*metric, *status, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_nine_prefixes() {
        for metric in Metric::ALL {
            for status in Status::ALL {
                let message = format!("{}_{}:12.5", metric.wire_tag(), status.wire_tag());
                let command = parse_command(&message).unwrap();
                assert_eq!(command, Command::new(metric, status, "12.5"));
            }
        }
    }

    #[test]
    fn display_text_uses_metric_unit() {
        assert_eq!(parse_command("TEMP_IN_THRESHOLD:21.4").unwrap().display_text(), "21.4 C");
        assert_eq!(parse_command("HUM_OUT_THRESHOLD:85").unwrap().display_text(), "85 %");
        assert_eq!(parse_command("PRES_THRESHOLDS_DISABLED:1013.25").unwrap().display_text(), "1013.25 hPa");
    }

    #[test]
    fn value_is_everything_after_first_colon() {
        let command = parse_command("TEMP_IN_THRESHOLD:12:30").unwrap();
        assert_eq!(command.value, "12:30");
        let command = parse_command("HUM_IN_THRESHOLD:").unwrap();
        assert_eq!(command.value, "");
        assert_eq!(command.display_text(), " %");
    }

    #[test]
    fn value_is_not_reparsed() {
        let command = parse_command("PRES_OUT_THRESHOLD: not a number ").unwrap();
        assert_eq!(command.value, " not a number ");
    }

    #[test]
    fn unknown_messages_do_not_parse() {
        for message in ["", "hello", "TEMP_IN_THRESHOLD", "temp_in_threshold:1", " TEMP_IN_THRESHOLD:1", "WIND_IN_THRESHOLD:3", "TEMP_UNKNOWN:4"] {
            assert!(parse_command(message).is_none(), "{:?} should not parse", message);
        }
    }

    #[test]
    fn wire_form_round_trips() {
        let command = Command::new(Metric::Humidity, Status::OutOfThreshold, "85");
        assert_eq!(command.to_string(), "HUM_OUT_THRESHOLD:85");
        assert_eq!(parse_command(&command.to_string()), Some(command));
    }

    #[test]
    fn metric_from_name_or_tag() {
        assert_eq!(Metric::from_name("temperature"), Some(Metric::Temperature));
        assert_eq!(Metric::from_name("HUM"), Some(Metric::Humidity));
        assert_eq!(Metric::from_name("Pres"), Some(Metric::Pressure));
        assert_eq!(Metric::from_name("wind"), None);
        assert_eq!(Metric::from_name(""), None);
    }
}
