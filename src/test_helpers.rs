use core::convert::Infallible;
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use crate::command::CTRL_Z;
use crate::display::{segment::SegmentDriver, DisplayStatus, StatusDisplay};
use crate::remote::TemperatureSensor;

/// Echo of `cmd` followed by `lines`, the way the modem answers with `ATE1`.
pub fn at_reply(cmd: &str, lines: &[&str]) -> Vec<u8> {
    let mut reply = format!("{}\r\r\n", cmd).into_bytes();
    for line in lines {
        reply.extend_from_slice(line.as_bytes());
        reply.extend_from_slice(b"\r\n");
    }
    reply
}

/// Scripted serial port. Each completed command is checked against the
/// script in order and its canned reply, if any, becomes readable.
#[derive(Default)]
pub struct MockSerial {
    script: VecDeque<(String, Option<Vec<u8>>, Vec<u8>)>,
    rx: VecDeque<u8>,
    late: VecDeque<u8>,
    tx: Vec<u8>,
    written: Vec<String>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, cmd: &str, reply: Vec<u8>) -> Self {
        self.script.push_back((cmd.into(), Some(reply), Vec::new()));
        self
    }

    /// Like [`MockSerial::reply`], but `late` only becomes readable after
    /// the reader has once found nothing pending.
    pub fn reply_late(mut self, cmd: &str, reply: Vec<u8>, late: &[u8]) -> Self {
        self.script.push_back((cmd.into(), Some(reply), late.to_vec()));
        self
    }

    /// `cmd` is accepted but never answered.
    pub fn silent(mut self, cmd: &str) -> Self {
        self.script.push_back((cmd.into(), None, Vec::new()));
        self
    }

    /// Bytes readable before any command is sent.
    pub fn unsolicited(mut self, bytes: &[u8]) -> Self {
        self.rx.extend(bytes);
        self
    }

    pub fn written(&self) -> Vec<String> {
        self.written.clone()
    }

    pub fn finished(&self) -> bool {
        self.script.is_empty()
    }

    fn complete(&mut self) {
        let cmd = String::from_utf8(core::mem::take(&mut self.tx)).unwrap();
        let (expected, reply, late) = self
            .script
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected command {:?}", cmd));
        assert_eq!(cmd, expected, "Commands out of order");
        if let Some(reply) = reply {
            self.rx.extend(reply);
        }
        self.late.extend(late);
        self.written.push(cmd);
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        if self.rx.is_empty() && !self.late.is_empty() {
            self.rx.extend(self.late.drain(..));
            return Ok(false);
        }
        Ok(!self.rx.is_empty())
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            if b == CTRL_Z {
                self.complete();
            } else if b == b'\n' && self.tx.last() == Some(&b'\r') {
                self.tx.pop();
                self.complete();
            } else {
                self.tx.push(b);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Output pin recording every level it was driven to.
#[derive(Debug, Default)]
pub struct MockPin {
    pub levels: Vec<bool>,
}

impl MockPin {
    pub fn is_high(&self) -> bool {
        self.levels.last().copied().unwrap_or(false)
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Display keeping every status it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub shown: Vec<DisplayStatus>,
}

impl StatusDisplay for RecordingDisplay {
    fn show(&mut self, status: DisplayStatus) {
        self.shown.push(status);
    }
}

/// Segment driver keeping every text it was asked to write.
#[derive(Debug, Default)]
pub struct MockDriver {
    pub texts: Vec<String>,
    pub fail: bool,
}

impl SegmentDriver for MockDriver {
    type Error = ();

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        if self.fail {
            return Err(());
        }
        self.texts.push(text.into());
        Ok(())
    }
}

pub struct MockSensor(pub Option<i32>);

impl TemperatureSensor for MockSensor {
    type Error = ();

    fn read_centi_celsius(&mut self) -> Result<i32, Self::Error> {
        self.0.ok_or(())
    }
}
