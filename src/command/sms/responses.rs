//! Responses for SMS commands
use heapless::String;

use crate::command::{field, Payload};
use crate::error::Error;

/// Read message +CMGR
///
/// `+CMGR: <stat>,<oa>,[<alpha>],<scts>` followed by the text on its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    pub sender: String<32>,
    pub text: String<160>,
}

impl Message {
    pub fn parse(payload: &Payload) -> Result<Self, Error> {
        let header = payload.line_with("+CMGR:").ok_or(Error::Parse)?;
        let body = payload.line_after("+CMGR:").ok_or(Error::Parse)?;

        Ok(Self {
            sender: truncated(field(header, 1).unwrap_or_default()),
            text: truncated(body),
        })
    }
}

fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
