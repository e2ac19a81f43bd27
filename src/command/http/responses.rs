//! Responses for HTTP(S) commands
use crate::command::{field, Payload};
use crate::error::Error;

/// Request result `+SHREQ: "<type>",<StatusCode>,<DataLen>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestResult {
    pub status: u16,
    pub length: usize,
}

impl RequestResult {
    pub fn parse(payload: &Payload) -> Result<Self, Error> {
        let line = payload.line_with("+SHREQ:").ok_or(Error::Parse)?;
        Self::parse_line(line)
    }

    pub(crate) fn parse_line(line: &str) -> Result<Self, Error> {
        let status = field(line, 1)
            .and_then(|s| s.parse().ok())
            .ok_or(Error::Parse)?;
        let length = field(line, 2)
            .and_then(|s| s.parse().ok())
            .ok_or(Error::Parse)?;
        Ok(Self { status, length })
    }

    pub fn is_success(&self) -> bool {
        self.status <= 299
    }
}

/// HTTP session state +SHSTATE, 1 when connected
pub fn session_connected(payload: &Payload) -> Result<bool, Error> {
    let line = payload.line_with("+SHSTATE:").ok_or(Error::Parse)?;
    match field(line, 0) {
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        _ => Err(Error::Parse),
    }
}
