use embassy_time::{block_for, Duration, Instant};
use embedded_io::{Error as _, Read, ReadReady, Write};
use heapless::Deque;

use crate::command::{is_error, urc::Urc, Command, Expect, Line, Payload, Response};
use crate::module_timing::command_time;

/// Unsolicited result codes kept between exchanges.
pub const URC_CAPACITY: usize = 8;

/// Gap between polls of an idle transport.
const IDLE_POLL: Duration = Duration::from_millis(1);

enum Event {
    Idle,
    Partial,
    Prompt,
    Line,
}

/// Request/response exchange with the modem over a serial transport.
///
/// Exactly one exchange is in flight at a time: [`AtChannel::send`] writes the
/// command and reads until its terminator, an error result code or the
/// deadline. Unsolicited lines seen on the way are queued and handed out by
/// [`AtChannel::next_urc`].
pub struct AtChannel<T> {
    pub(crate) transport: T,
    urcs: Deque<Urc, URC_CAPACITY>,
    command_timeout: Duration,
}

impl<T> AtChannel<T>
where
    T: Read + ReadReady + Write,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            urcs: Deque::new(),
            command_timeout: command_time(),
        }
    }

    /// Timeout of commands built without one of their own.
    #[must_use]
    pub fn with_command_timeout(self, command_timeout: Duration) -> Self {
        Self {
            command_timeout,
            ..self
        }
    }

    pub fn release(self) -> T {
        self.transport
    }

    /// Perform one exchange. Never returns before either the expected
    /// terminator, an error line, or the command's timeout having elapsed.
    pub fn send(&mut self, cmd: &Command) -> Response {
        self.drain();

        debug!("Sending command: {}", cmd.text());
        if let Err(e) = self.write(cmd) {
            return e;
        }

        let start = Instant::now();
        let limit = cmd.time_limit().unwrap_or(self.command_timeout);
        let expect = cmd.expected();
        let mut line = Line::new();
        let mut payload = Payload::default();
        // Set once the expected line of an `Expect::LineThenOk` was seen
        let mut found = false;
        // The next line is free text
        let mut data = false;

        loop {
            if start.elapsed() >= limit {
                warn!(
                    "No response to {} within {} ms",
                    cmd.text(),
                    limit.as_millis()
                );
                return Response::Timeout;
            }

            match self.poll(&mut line, expect) {
                Err(e) => return e,
                Ok(Event::Idle) => block_for(IDLE_POLL),
                Ok(Event::Partial) => {}
                Ok(Event::Prompt) => {
                    trace!("Prompt received");
                    payload.push(">");
                    return Response::Success(payload);
                }
                Ok(Event::Line) => {
                    let text = clean(&line);
                    if data {
                        data = false;
                        payload.push(text);
                    } else if text.is_empty() || text == cmd.text() {
                        // Blank or echo
                    } else if is_error(text) {
                        warn!("{} failed: {}", cmd.text(), text);
                        return Response::failure(text);
                    } else if (found && text == "OK") || (!found && expect.matches_line(text)) {
                        payload.push(text);
                        if expect.needs_final_ok() && !found {
                            found = true;
                        } else {
                            trace!("{} completed", cmd.text());
                            return Response::Success(payload);
                        }
                    } else if let Some(urc) = Urc::parse(text) {
                        self.queue(urc);
                    } else {
                        data = cmd.starts_data(text);
                        payload.push(text);
                    }
                    line.clear();
                }
            }
        }
    }

    /// Read raw bytes, such as a `+SHREAD` body, until `buf` is full or
    /// `timeout` elapses. Returns the number of bytes read.
    pub fn read_bytes(&mut self, buf: &mut [u8], timeout: Duration) -> usize {
        let start = Instant::now();
        let mut filled = 0;

        while filled < buf.len() && start.elapsed() < timeout {
            match self.transport.read_ready() {
                Ok(true) => match self.transport.read(&mut buf[filled..]) {
                    Ok(n) => filled += n,
                    Err(e) => {
                        error!("Serial read failed: {:?}", e.kind());
                        break;
                    }
                },
                Ok(false) => block_for(IDLE_POLL),
                Err(e) => {
                    error!("Serial read failed: {:?}", e.kind());
                    break;
                }
            }
        }

        if filled < buf.len() {
            warn!("Read {} of {} bytes", filled, buf.len());
        }
        filled
    }

    /// The oldest queued unsolicited result code, or the next one to arrive
    /// within `timeout`. Other lines read while waiting are dropped.
    pub fn next_urc(&mut self, timeout: Duration) -> Option<Urc> {
        if let Some(urc) = self.urcs.pop_front() {
            return Some(urc);
        }

        let start = Instant::now();
        let mut line = Line::new();
        while start.elapsed() < timeout {
            match self.poll(&mut line, Expect::Ok) {
                Err(_) => return None,
                Ok(Event::Idle) => block_for(IDLE_POLL),
                Ok(Event::Line) => {
                    let urc = Urc::parse(clean(&line));
                    if urc.is_some() {
                        return urc;
                    }
                    line.clear();
                }
                Ok(_) => {}
            }
        }
        None
    }

    /// Collect whatever arrived between exchanges, so that stale lines are
    /// never taken as part of the next response.
    fn drain(&mut self) {
        let mut line = Line::new();
        loop {
            match self.poll(&mut line, Expect::Ok) {
                Ok(Event::Line) => {
                    let text = clean(&line);
                    if let Some(urc) = Urc::parse(text) {
                        self.queue(urc);
                    } else if !text.is_empty() {
                        debug!("Discarding stale line: {}", text);
                    }
                    line.clear();
                }
                Ok(Event::Partial) | Ok(Event::Prompt) => {}
                Ok(Event::Idle) | Err(_) => break,
            }
        }
    }

    fn queue(&mut self, urc: Urc) {
        debug!("URC: {:?}", urc);
        if self.urcs.is_full() {
            warn!("URC queue full, dropping oldest");
            self.urcs.pop_front();
        }
        self.urcs.push_back(urc).ok();
    }

    fn poll(&mut self, line: &mut Line, expect: Expect) -> Result<Event, Response> {
        let Some(byte) = self.read_byte()? else {
            return Ok(Event::Idle);
        };

        match byte {
            b'\n' => Ok(Event::Line),
            b'\r' => Ok(Event::Partial),
            b if line.is_empty() && expect.matches_prompt(b) => Ok(Event::Prompt),
            b => {
                if line.push(char::from(b)).is_err() {
                    trace!("Line too long, truncating");
                }
                Ok(Event::Partial)
            }
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Response> {
        let ready = self.transport.read_ready().map_err(|e| {
            error!("Serial read failed: {:?}", e.kind());
            Response::failure("serial read failed")
        })?;
        if !ready {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        match self.transport.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) => {
                error!("Serial read failed: {:?}", e.kind());
                Err(Response::failure("serial read failed"))
            }
        }
    }

    fn write(&mut self, cmd: &Command) -> Result<(), Response> {
        self.transport
            .write_all(cmd.text().as_bytes())
            .and_then(|_| self.transport.write_all(cmd.line_ending().as_bytes()))
            .and_then(|_| self.transport.flush())
            .map_err(|e| {
                error!("Serial write failed: {:?}", e.kind());
                Response::failure("serial write failed")
            })
    }
}

fn clean(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\u{1a}')
}
