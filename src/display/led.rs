use embassy_time::{block_for, Duration};
use embedded_hal::digital::OutputPin;

use super::{DisplayStatus, StatusDisplay};

const BLINK_TIME: Duration = Duration::from_millis(250);

/// The board's user LED as a status output: lit while registered or after a
/// successful send, toggling on every poll while searching, dark otherwise.
pub struct LedIndicator<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> LedIndicator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    pub fn release(self) -> P {
        self.pin
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn set(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => self.lit = on,
            Err(_) => warn!("Failed to drive LED"),
        }
    }

    /// Flash `times` times, leaving the LED lit.
    pub fn blink(&mut self, times: u8) {
        debug!("Blinking LED {} time(s)", times);
        for _ in 0..times {
            self.set(false);
            block_for(BLINK_TIME);
            self.set(true);
            block_for(BLINK_TIME);
        }
    }
}

impl<P: OutputPin> StatusDisplay for LedIndicator<P> {
    fn show(&mut self, status: DisplayStatus) {
        match status {
            DisplayStatus::Registered | DisplayStatus::Sent => self.set(true),
            DisplayStatus::SearchingNetwork => self.set(!self.lit),
            DisplayStatus::Uninitialized | DisplayStatus::Error => self.set(false),
            DisplayStatus::Sending | DisplayStatus::Value(_) | DisplayStatus::Temperature(_) => {}
        }
    }
}
