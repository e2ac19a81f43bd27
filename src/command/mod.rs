//! AT commands for the SIMCom SIM7080 series
//! Following the SIM7070_SIM7080_SIM7090 Series AT Command Manual.
//!
//! A [`Command`] is a single line of text plus the pattern that ends its
//! exchange. The [`crate::channel::AtChannel`] turns it into exactly one
//! [`Response`].

pub mod general;
pub mod http;
pub mod network_service;
pub mod psn;
pub mod sms;
pub mod urc;

use core::fmt::Write;

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::error::Error;

/// Longest response line kept by the channel.
pub const LINE_LEN: usize = 256;
/// Longest command text, including SMS bodies and HTTP form data.
pub const CMD_LEN: usize = 256;
/// Number of response lines kept in a [`Payload`].
pub const PAYLOAD_LINES: usize = 16;

pub type Line = String<LINE_LEN>;
pub type Reason = String<LINE_LEN>;

/// Ctrl-Z, the modem's end of message marker.
pub const CTRL_Z: u8 = 0x1A;

/// What ends an exchange successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Expect {
    /// The final `OK` result code.
    Ok,
    /// A completed line containing the given text, e.g. `ACTIVE` or `+SHREQ:`.
    Line(&'static str),
    /// A line containing the given text and then the final `OK`, e.g.
    /// `+CMGS: <mr>`.
    LineThenOk(&'static str),
    /// A prompt byte at the start of a line, matched without waiting for a
    /// line ending, e.g. the `>` sent before message text.
    Prompt(u8),
}

impl Default for Expect {
    fn default() -> Self {
        Self::Ok
    }
}

impl Expect {
    pub(crate) fn matches_line(&self, line: &str) -> bool {
        match self {
            Self::Ok => line == "OK",
            Self::Line(text) | Self::LineThenOk(text) => line.contains(text),
            Self::Prompt(_) => false,
        }
    }

    pub(crate) fn needs_final_ok(&self) -> bool {
        matches!(self, Self::LineThenOk(_))
    }

    pub(crate) fn matches_prompt(&self, byte: u8) -> bool {
        matches!(self, Self::Prompt(p) if *p == byte)
    }
}

/// How the command text is terminated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEnding {
    CrLf,
    /// Message text after a `>` prompt.
    CtrlZ,
}

impl LineEnding {
    pub(crate) fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::CrLf => b"\r\n",
            Self::CtrlZ => &[CTRL_Z],
        }
    }
}

/// An outbound request. Deliberately not `Clone`: a retry builds a new one.
#[derive(Debug, PartialEq, Eq)]
pub struct Command {
    text: String<CMD_LEN>,
    expect: Expect,
    ending: LineEnding,
    timeout: Option<Duration>,
    data_after: Option<&'static str>,
}

impl Command {
    /// Creates a command ending in `OK` with the channel's default timeout.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCommand`] if `text` is empty, not ASCII, contains a
    /// line break or does not fit in [`CMD_LEN`].
    pub fn new(text: &str) -> Result<Self, Error> {
        let mut s = String::new();
        s.push_str(text).map_err(|_| Error::InvalidCommand)?;
        Self::from_text(s)
    }

    /// Same as [`Command::new`], from format arguments.
    pub fn formatted(args: core::fmt::Arguments<'_>) -> Result<Self, Error> {
        let mut s = String::new();
        s.write_fmt(args).map_err(|_| Error::InvalidCommand)?;
        Self::from_text(s)
    }

    /// Message text sent after a prompt, terminated by Ctrl-Z.
    pub fn message(text: &str) -> Result<Self, Error> {
        if text.bytes().any(|b| b == CTRL_Z) {
            return Err(Error::InvalidCommand);
        }
        Ok(Self::new(text)?.ending(LineEnding::CtrlZ))
    }

    fn from_text(text: String<CMD_LEN>) -> Result<Self, Error> {
        if text.is_empty() || !text.is_ascii() || text.contains(|c: char| c == '\r' || c == '\n') {
            return Err(Error::InvalidCommand);
        }

        Ok(Self {
            text,
            expect: Expect::Ok,
            ending: LineEnding::CrLf,
            timeout: None,
            data_after: None,
        })
    }

    #[must_use]
    pub fn expect(self, expect: Expect) -> Self {
        Self { expect, ..self }
    }

    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// The line after one starting with `prefix` is free text, such as a
    /// message body, and is kept verbatim even if it reads `OK` or `ERROR`.
    #[must_use]
    pub fn data_line_after(self, prefix: &'static str) -> Self {
        Self {
            data_after: Some(prefix),
            ..self
        }
    }

    #[must_use]
    pub fn ending(self, ending: LineEnding) -> Self {
        Self { ending, ..self }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expected(&self) -> Expect {
        self.expect
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// The timeout set with [`Command::timeout`], if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn starts_data(&self, line: &str) -> bool {
        self.data_after.is_some_and(|prefix| line.starts_with(prefix))
    }
}

/// Response lines of a successful exchange. Echo and blank lines are not
/// kept, except for an empty data line; the terminator line is always the
/// last one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payload {
    lines: Vec<Line, PAYLOAD_LINES>,
}

impl Payload {
    pub(crate) fn push(&mut self, line: &str) {
        let mut l = Line::new();
        for c in line.chars() {
            if l.push(c).is_err() {
                break;
            }
        }
        if self.lines.push(l).is_err() {
            warn!("Response payload full, dropping line");
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line starting with `prefix`, e.g. `+COPS:`.
    pub fn line_with(&self, prefix: &str) -> Option<&str> {
        self.lines().find(|l| l.starts_with(prefix))
    }

    /// The line following the first line starting with `prefix`. Used for
    /// responses where a header line precedes free text (`+CMGR:`).
    pub fn line_after(&self, prefix: &str) -> Option<&str> {
        let mut lines = self.lines();
        lines.find(|l| l.starts_with(prefix))?;
        lines.next()
    }
}

/// Outcome of exactly one exchange.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    Success(Payload),
    Failure(Reason),
    Timeout,
}

impl Response {
    pub(crate) fn failure(text: &str) -> Self {
        let mut reason = Reason::new();
        for c in text.chars() {
            if reason.push(c).is_err() {
                break;
            }
        }
        Self::Failure(reason)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<Payload, Error> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Failure(reason) => Err(Error::ModemFailure(reason)),
            Self::Timeout => Err(Error::Timeout),
        }
    }
}

impl From<Error> for Response {
    fn from(e: Error) -> Self {
        match e {
            Error::Timeout => Self::Timeout,
            e => Self::Failure(e.reason()),
        }
    }
}

/// Final result codes that end an exchange with a failure.
pub(crate) fn is_error(line: &str) -> bool {
    line == "ERROR" || line.starts_with("+CME ERROR") || line.starts_with("+CMS ERROR")
}

/// Comma separated values of an information line such as
/// `+SHREQ: "GET",200,15`. The `+XXX: ` prefix is skipped, quotes are removed
/// and commas inside quotes do not split.
pub fn fields(line: &str) -> Fields<'_> {
    let rest = match line.find(": ") {
        Some(i) if line.starts_with('+') => &line[i + 2..],
        _ => line,
    };
    Fields { rest: Some(rest) }
}

/// The `n`th (zero based) value of an information line.
pub fn field(line: &str, n: usize) -> Option<&str> {
    fields(line).nth(n)
}

pub struct Fields<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let mut quoted = false;
        for (i, c) in rest.char_indices() {
            match c {
                '"' => quoted = !quoted,
                ',' if !quoted => {
                    self.rest = Some(&rest[i + 1..]);
                    return Some(rest[..i].trim().trim_matches('"'));
                }
                _ => {}
            }
        }
        self.rest = None;
        Some(rest.trim().trim_matches('"'))
    }
}
