//! Status output for the board: a four digit segment display and the user LED.
//!
//! The [`crate::Device`] reports every state change to a [`StatusDisplay`].
//! Outputs never fail towards the caller; a broken display must not take the
//! modem down with it.

pub mod led;
pub mod segment;

use core::fmt::Write;

use heapless::String;

use crate::state::ModemState;

pub use led::LedIndicator;
pub use segment::{SegmentDisplay, SegmentDriver};

/// What to put on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayStatus {
    Uninitialized,
    SearchingNetwork,
    Registered,
    Error,
    /// A message or request is on its way
    Sending,
    /// The last message or request was accepted
    Sent,
    /// Four hex digits
    Value(u16),
    /// Hundredths of a degree Celsius
    Temperature(i32),
}

impl From<ModemState> for DisplayStatus {
    fn from(state: ModemState) -> Self {
        match state {
            ModemState::Uninitialized => Self::Uninitialized,
            ModemState::SearchingNetwork => Self::SearchingNetwork,
            ModemState::Registered => Self::Registered,
            ModemState::Error => Self::Error,
        }
    }
}

impl DisplayStatus {
    /// Text for a four digit segment display. A `.` lights the decimal point
    /// of the character before it and takes no digit of its own.
    pub fn render(&self) -> String<8> {
        let mut text = String::new();
        match self {
            Self::Uninitialized => text.push_str("----").ok(),
            Self::SearchingNetwork => text.push_str("Srch").ok(),
            Self::Registered => text.push_str("rEG ").ok(),
            Self::Error => text.push_str("Err ").ok(),
            Self::Sending => text.push_str("SEnd").ok(),
            Self::Sent => text.push_str("SEnt").ok(),
            Self::Value(v) => write!(text, "{:04X}", v).ok(),
            Self::Temperature(centi) => {
                render_temperature(&mut text, *centi);
                Some(())
            }
        };
        text
    }

    /// The decimal digits of `value` shown as they read, e.g. `12` as `0012`.
    /// `None` if `value` has more than four digits.
    pub fn decimal(value: u32) -> Option<Self> {
        if value > 9999 {
            return None;
        }
        let mut bcd = 0u16;
        let mut rest = value;
        for shift in [0, 4, 8, 12] {
            bcd |= ((rest % 10) as u16) << shift;
            rest /= 10;
        }
        Some(Self::Value(bcd))
    }
}

/// Three characters of the `{:.2}` rendering with the decimal point folded
/// into the preceding digit, then a `c`: `23.45` shows as `23.4c`.
fn render_temperature(text: &mut String<8>, centi: i32) {
    let mut formatted: String<16> = String::new();
    let sign = if centi < 0 { "-" } else { "" };
    let abs = centi.unsigned_abs();
    write!(formatted, "{}{}.{:02}", sign, abs / 100, abs % 100).ok();

    let mut digits = 0;
    for c in formatted.chars() {
        if c == '.' {
            if 0 < digits && digits < 3 {
                text.push('.').ok();
            }
            continue;
        }
        text.push(c).ok();
        digits += 1;
        if digits == 3 {
            break;
        }
    }
    text.push('c').ok();
}

/// Anything that can show a [`DisplayStatus`].
pub trait StatusDisplay {
    fn show(&mut self, status: DisplayStatus);
}

impl<D: StatusDisplay + ?Sized> StatusDisplay for &mut D {
    fn show(&mut self, status: DisplayStatus) {
        (**self).show(status)
    }
}

impl<A: StatusDisplay, B: StatusDisplay> StatusDisplay for (A, B) {
    fn show(&mut self, status: DisplayStatus) {
        self.0.show(status);
        self.1.show(status);
    }
}

/// For boards without any status output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplay;

impl StatusDisplay for NoDisplay {
    fn show(&mut self, status: DisplayStatus) {
        trace!("Status: {:?}", status);
    }
}
