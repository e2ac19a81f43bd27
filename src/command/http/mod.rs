//! ### HTTP(S) application
//!
//! A request is a short-lived session: configure the URL, connect, set
//! headers and body, send the request and read back the response body.
pub mod responses;
pub mod types;

use embassy_time::Duration;

use super::{Command, Expect};
use crate::error::Error;
use types::HttpVerb;

/// Body buffer size configured with `+SHCONF="BODYLEN"`.
pub const BODY_LEN: usize = 1024;
/// Header buffer size configured with `+SHCONF="HEADERLEN"`.
pub const HEADER_LEN: usize = 350;

fn quotable(s: &str) -> Result<(), Error> {
    if s.contains('"') {
        Err(Error::InvalidCommand)
    } else {
        Ok(())
    }
}

/// SSL on, default certificate, plus the body and header buffer sizes.
pub fn configure_https() -> Result<Command, Error> {
    Command::formatted(format_args!(
        "AT+SHSSL=1,\"\";+SHCONF=\"BODYLEN\",{};+SHCONF=\"HEADERLEN\",{}",
        BODY_LEN, HEADER_LEN
    ))
}

/// Query HTTP(S) connection status +SHSTATE
pub fn session_state() -> Result<Command, Error> {
    Command::new("AT+SHSTATE?")
}

/// Disconnect HTTP(S) +SHDISC
pub fn disconnect() -> Result<Command, Error> {
    Command::new("AT+SHDISC")
}

/// Set HTTP(S) parameter +SHCONF="URL"
pub fn set_url(server: &str) -> Result<Command, Error> {
    quotable(server)?;
    Command::formatted(format_args!("AT+SHCONF=\"URL\",\"{}\"", server))
}

/// HTTP(S) connection +SHCONN
pub fn connect(timeout: Duration) -> Result<Command, Error> {
    Ok(Command::new("AT+SHCONN")?.timeout(timeout))
}

/// Clear HTTP(S) header +SHCHEAD
pub fn clear_headers() -> Result<Command, Error> {
    Command::new("AT+SHCHEAD")
}

/// Add head +SHAHEAD, the first half of the fixed request headers
pub fn content_headers() -> Result<Command, Error> {
    Command::new(
        "AT+SHAHEAD=\"Content-Type\",\"application/x-www-form-urlencoded\";+SHAHEAD=\"User-Agent\",\"twilio-pi-pico/1.0.0\"",
    )
}

/// Add head +SHAHEAD, the second half of the fixed request headers
pub fn connection_headers() -> Result<Command, Error> {
    Command::new(
        "AT+SHAHEAD=\"Cache-control\",\"no-cache\";+SHAHEAD=\"Connection\",\"keep-alive\";+SHAHEAD=\"Accept\",\"*/*\"",
    )
}

/// Clear body content parameters +SHCPARA, then set body content parameter
/// +SHPARA. `body` is the urlencoded form data.
pub fn set_body(body: &str) -> Result<Command, Error> {
    quotable(body)?;
    Command::formatted(format_args!("AT+SHCPARA;+SHPARA=\"data\",\"{}\"", body))
}

/// Set request type +SHREQ
///
/// `OK` comes first; the exchange is complete on
/// `+SHREQ: "<type>",<StatusCode>,<DataLen>`.
pub fn request(path: &str, verb: HttpVerb, timeout: Duration) -> Result<Command, Error> {
    quotable(path)?;
    Ok(
        Command::formatted(format_args!("AT+SHREQ=\"{}\",{}", path, verb as u8))?
            .expect(Expect::Line("+SHREQ:"))
            .timeout(timeout),
    )
}

/// Read response value +SHREAD
///
/// The `+SHREAD: <len>` header is followed by `len` raw bytes, read with
/// [`crate::channel::AtChannel::read_bytes`].
pub fn read(length: usize, timeout: Duration) -> Result<Command, Error> {
    Ok(Command::formatted(format_args!("AT+SHREAD=0,{}", length))?
        .expect(Expect::Line("+SHREAD:"))
        .timeout(timeout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_codes() {
        let cmd = request("/api/v1/logs", HttpVerb::Post, Duration::from_secs(90)).unwrap();
        assert_eq!(cmd.text(), "AT+SHREQ=\"/api/v1/logs\",3");
        assert_eq!(cmd.expected(), Expect::Line("+SHREQ:"));

        let cmd = request("/api/v1/status", HttpVerb::Get, Duration::from_secs(90)).unwrap();
        assert_eq!(cmd.text(), "AT+SHREQ=\"/api/v1/status\",1");
    }

    #[test]
    fn quoted_values_are_rejected() {
        assert_eq!(set_body("a=\"1\""), Err(Error::InvalidCommand));
        assert_eq!(
            set_body("temp=23.40").unwrap().text(),
            "AT+SHCPARA;+SHPARA=\"data\",\"temp=23.40\""
        );
        assert_eq!(
            set_url("https://example.com").unwrap().text(),
            "AT+SHCONF=\"URL\",\"https://example.com\""
        );
    }

    #[test]
    fn https_buffers() {
        assert_eq!(
            configure_https().unwrap().text(),
            "AT+SHSSL=1,\"\";+SHCONF=\"BODYLEN\",1024;+SHCONF=\"HEADERLEN\",350"
        );
    }
}
