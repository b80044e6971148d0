use super::Status;
use crate::hardware::{BLUE, GREEN, GREY, RED, Rgb};

/// Foreground and background colour for a rendered status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStyle {
    pub foreground: Rgb,
    pub background: Rgb,
}

impl DisplayStyle {
    /// Colour depends on status only; the background is blue for every status.
    pub fn for_status(status: Status) -> Self {
        let foreground = match status {
            Status::InThreshold => GREEN,
            Status::OutOfThreshold => RED,
            Status::ThresholdsDisabled => GREY,
        };
        Self { foreground, background: BLUE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colours() {
        assert_eq!(DisplayStyle::for_status(Status::InThreshold).foreground, [0, 255, 0]);
        assert_eq!(DisplayStyle::for_status(Status::OutOfThreshold).foreground, [255, 0, 0]);
        assert_eq!(DisplayStyle::for_status(Status::ThresholdsDisabled).foreground, [128, 128, 128]);
    }

    #[test]
    fn background_is_always_blue() {
        for status in Status::ALL {
            assert_eq!(DisplayStyle::for_status(status).background, [0, 0, 80]);
        }
    }
}
