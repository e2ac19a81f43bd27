use super::{DisplayStatus, StatusDisplay};

/// Four digit seven-segment display hardware, such as an HT16K33 backpack.
///
/// `text` holds up to four characters; a `.` sets the decimal point of the
/// character before it.
pub trait SegmentDriver {
    type Error: core::fmt::Debug;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
}

pub struct SegmentDisplay<S> {
    driver: S,
}

impl<S: SegmentDriver> SegmentDisplay<S> {
    pub fn new(driver: S) -> Self {
        Self { driver }
    }

    pub fn release(self) -> S {
        self.driver
    }
}

impl<S: SegmentDriver> StatusDisplay for SegmentDisplay<S> {
    fn show(&mut self, status: DisplayStatus) {
        let text = status.render();
        if self.driver.write_text(&text).is_err() {
            warn!("Failed to update display with {}", text.as_str());
        }
    }
}
