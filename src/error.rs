use core::fmt::Write;

use crate::command::Reason;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    // Exchange errors
    Timeout,
    ModemFailure(Reason),

    // Device errors
    PoweredDown,
    RegistrationFailed,
    IoPin,
    Sensor,

    // Request errors
    InvalidCommand,
    Overflow,
    Parse,
    Http(u16),
}

impl Error {
    /// Short human readable description, used as the failure text when an
    /// error is folded back into a [`crate::command::Response`].
    pub fn reason(&self) -> Reason {
        let text = match self {
            Self::ModemFailure(r) => return r.clone(),
            Self::Http(status) => {
                let mut reason = Reason::new();
                write!(reason, "HTTP {}", status).ok();
                return reason;
            }
            Self::Timeout => "timeout",
            Self::PoweredDown => "modem not responding",
            Self::RegistrationFailed => "network registration failed",
            Self::IoPin => "pin error",
            Self::Sensor => "sensor read failed",
            Self::InvalidCommand => "invalid command",
            Self::Overflow => "buffer overflow",
            Self::Parse => "unparsable response",
        };
        let mut reason = Reason::new();
        reason.push_str(text).ok();
        reason
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::Overflow
    }
}
