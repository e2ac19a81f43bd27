//! ### General commands
//!
//! Liveness probing and the one-shot module configuration issued at boot.

use super::Command;
use crate::error::Error;

/// Command echo on `ATE1`
///
/// Used as the liveness probe while the module boots: it only answers `OK`
/// once the UART is up. Echo stays enabled afterwards, the channel skips the
/// echoed line.
pub fn echo_on() -> Result<Command, Error> {
    Command::new("ATE1")
}

/// Chained module configuration for a Cat-M Super SIM:
///
/// - `+CMEE=2` verbose `+CME ERROR:` reports
/// - `+CMGF=1` SMS text mode
/// - `+CMGD=,4` delete any left-over messages
/// - `+CNMP=38` LTE only
/// - `+CMNB=1` Cat-M only
/// - `+CGDCONT=1,"IP","<apn>"` the PDP context APN
pub fn configure(apn: &str) -> Result<Command, Error> {
    if apn.contains('"') {
        return Err(Error::InvalidCommand);
    }
    Command::formatted(format_args!(
        "AT+CMEE=2;+CMGF=1;+CMGD=,4;+CNMP=38;+CMNB=1;+CGDCONT=1,\"IP\",\"{}\"",
        apn
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_sets_apn() {
        assert_eq!(
            configure("super").unwrap().text(),
            "AT+CMEE=2;+CMGF=1;+CMGD=,4;+CNMP=38;+CMNB=1;+CGDCONT=1,\"IP\",\"super\""
        );
        assert_eq!(configure("bad\"apn"), Err(Error::InvalidCommand));
    }
}
