//! ### Packet switched network
//!
//! The SIM7080 keeps its own IP stack per PDP context, driven by `+CNACT`.
pub mod types;

use embassy_time::Duration;

use super::{field, Command, Expect, Payload};
use crate::error::Error;
use types::ContextStatus;

/// App network active +CNACT, read command
///
/// One `+CNACT: <pdpidx>,<statusx>,<address>` line per context.
pub fn get_app_network_state() -> Result<Command, Error> {
    Command::new("AT+CNACT?")
}

/// App network active +CNACT
///
/// The module answers `OK` straight away; the context is only usable once
/// `+APP PDP: <cid>,ACTIVE` follows.
pub fn activate(cid: u8, timeout: Duration) -> Result<Command, Error> {
    Ok(Command::formatted(format_args!("AT+CNACT={},1", cid))?
        .expect(Expect::Line(",ACTIVE"))
        .timeout(timeout))
}

pub fn deactivate(cid: u8) -> Result<Command, Error> {
    Command::formatted(format_args!("AT+CNACT={},0", cid))
}

/// Status of context `cid` in a `AT+CNACT?` response.
pub fn context_status(payload: &Payload, cid: u8) -> Result<ContextStatus, Error> {
    payload
        .lines()
        .filter(|l| l.starts_with("+CNACT:"))
        .find(|l| field(l, 0).and_then(|c| c.parse::<u8>().ok()) == Some(cid))
        .and_then(|l| field(l, 1))
        .and_then(ContextStatus::from_field)
        .ok_or(Error::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_waits_for_pdp_urc() {
        let cmd = activate(0, Duration::from_millis(2000)).unwrap();
        assert_eq!(cmd.text(), "AT+CNACT=0,1");
        assert_eq!(cmd.expected(), Expect::Line(",ACTIVE"));
        assert_eq!(cmd.time_limit(), Some(Duration::from_millis(2000)));
        assert_eq!(deactivate(0).unwrap().text(), "AT+CNACT=0,0");
    }

    #[test]
    fn context_status_per_cid() {
        let mut payload = Payload::default();
        payload.push("+CNACT: 0,1,\"10.64.1.2\"");
        payload.push("+CNACT: 1,0,\"0.0.0.0\"");
        payload.push("OK");

        assert_eq!(context_status(&payload, 0), Ok(ContextStatus::Active));
        assert_eq!(context_status(&payload, 1), Ok(ContextStatus::Inactive));
        assert_eq!(context_status(&payload, 3), Err(Error::Parse));
    }
}
