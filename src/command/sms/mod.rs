//! ### Short message service
//!
//! Text mode only (`+CMGF=1`, set by [`crate::command::general::configure`]).
pub mod responses;

use embassy_time::Duration;

use super::{Command, Expect};
use crate::error::Error;

/// Longest text a single message can carry in text mode.
pub const MAX_TEXT_LEN: usize = 160;

/// Send message +CMGS
///
/// The module answers with a `>` prompt, without line ending, and then
/// waits for the message text.
pub fn send(destination: &str) -> Result<Command, Error> {
    if destination.is_empty() || destination.contains('"') {
        return Err(Error::InvalidCommand);
    }
    Ok(Command::formatted(format_args!("AT+CMGS=\"{}\"", destination))?
        .expect(Expect::Prompt(b'>')))
}

/// The message text following the `>` prompt of [`send`], ended by Ctrl-Z.
/// Completes on the `OK` following `+CMGS: <mr>`.
pub fn text(body: &str, timeout: Duration) -> Result<Command, Error> {
    if body.len() > MAX_TEXT_LEN {
        return Err(Error::InvalidCommand);
    }
    Ok(Command::message(body)?
        .expect(Expect::LineThenOk("+CMGS:"))
        .timeout(timeout))
}

/// Read message +CMGR
///
/// The line after the `+CMGR:` header is the message text, whatever it says.
pub fn read(index: u16, timeout: Duration) -> Result<Command, Error> {
    Ok(Command::formatted(format_args!("AT+CMGR={}", index))?
        .data_line_after("+CMGR:")
        .timeout(timeout))
}

/// Delete message +CMGD, flag 4: all messages in storage
pub fn delete_all() -> Result<Command, Error> {
    Command::new("AT+CMGD=,4")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::LineEnding;

    #[test]
    fn send_waits_for_prompt() {
        let cmd = send("000").unwrap();
        assert_eq!(cmd.text(), "AT+CMGS=\"000\"");
        assert_eq!(cmd.expected(), Expect::Prompt(b'>'));
        assert_eq!(send(""), Err(Error::InvalidCommand));
    }

    #[test]
    fn text_length_limit() {
        let cmd = text("23.40", Duration::from_secs(10)).unwrap();
        assert_eq!(cmd.line_ending(), LineEnding::CtrlZ);
        assert_eq!(cmd.expected(), Expect::LineThenOk("+CMGS:"));

        let long = [b'x'; MAX_TEXT_LEN + 1];
        assert_eq!(
            text(core::str::from_utf8(&long).unwrap(), Duration::from_secs(10)),
            Err(Error::InvalidCommand)
        );
    }
}
