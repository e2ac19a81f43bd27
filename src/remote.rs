//! Commands received by text message: `LED=n`, `NUM=xxxx`, `TMP`, `GET`
//! and `POST`, matched case-insensitively.

use core::fmt::Write as _;

use embassy_time::Duration;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};
use heapless::String;
use serde::Deserialize;

use crate::client::Device;
use crate::command::http::types::HttpVerb;
use crate::display::{DisplayStatus, LedIndicator, StatusDisplay};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteCommand {
    /// Blink the LED n times
    Led(u8),
    /// Show four hex digits
    Num(u16),
    /// Report the temperature by text message and on the display
    Temperature,
    /// Fetch the server status and show it
    Get,
    /// Post the temperature and show the returned status
    Post,
    Unknown(String<32>),
}

fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

impl RemoteCommand {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        let parsed = if let Some(n) = strip_prefix_ignore_case(text, "LED=") {
            n.trim().parse().ok().map(Self::Led)
        } else if let Some(v) = strip_prefix_ignore_case(text, "NUM=") {
            u16::from_str_radix(v.trim(), 16).ok().map(Self::Num)
        } else if strip_prefix_ignore_case(text, "TMP").is_some() {
            Some(Self::Temperature)
        } else if strip_prefix_ignore_case(text, "GET").is_some() {
            Some(Self::Get)
        } else if strip_prefix_ignore_case(text, "POST").is_some() {
            Some(Self::Post)
        } else {
            None
        };

        parsed.unwrap_or_else(|| {
            let mut unknown = String::new();
            for c in text.chars() {
                if unknown.push(c).is_err() {
                    break;
                }
            }
            Self::Unknown(unknown)
        })
    }
}

/// Source of the readings for `TMP` and `POST`, such as an MCP9808.
pub trait TemperatureSensor {
    type Error: core::fmt::Debug;

    /// Hundredths of a degree Celsius.
    fn read_centi_celsius(&mut self) -> Result<i32, Self::Error>;
}

/// JSON body returned by the status and log endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub status: u32,
}

impl StatusReport {
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json_core::from_slice::<StatusReport>(json)
            .map(|(report, _)| report)
            .map_err(|_| Error::Parse)
    }
}

/// Where replies and requests go.
#[derive(Debug, Clone, Copy)]
pub struct RemoteSettings<'a> {
    /// Destination of the `TMP` reply
    pub reply_to: &'a str,
    /// `https://host` of the `GET` / `POST` server
    pub server: &'a str,
    pub status_path: &'a str,
    pub log_path: &'a str,
}

impl<'a> RemoteSettings<'a> {
    pub fn new(server: &'a str) -> Self {
        Self {
            reply_to: "000",
            server,
            status_path: "/api/v1/status",
            log_path: "/api/v1/logs",
        }
    }
}

/// Format hundredths of a degree as `23.40`.
pub fn celsius_text(centi: i32) -> String<16> {
    let mut text = String::new();
    let sign = if centi < 0 { "-" } else { "" };
    let abs = centi.unsigned_abs();
    write!(text, "{}{}.{:02}", sign, abs / 100, abs % 100).ok();
    text
}

/// Executes [`RemoteCommand`]s against a [`Device`].
pub struct CommandProcessor<'a, S, P> {
    sensor: S,
    led: LedIndicator<P>,
    settings: RemoteSettings<'a>,
}

impl<'a, S, P> CommandProcessor<'a, S, P>
where
    S: TemperatureSensor,
    P: OutputPin,
{
    pub fn new(sensor: S, led: LedIndicator<P>, settings: RemoteSettings<'a>) -> Self {
        Self {
            sensor,
            led,
            settings,
        }
    }

    pub fn led(&mut self) -> &mut LedIndicator<P> {
        &mut self.led
    }

    /// Wait up to `wait` for a message, execute the command it carries and
    /// empty the message storage. `None` if no message arrived.
    pub fn poll<T, D, PWR>(
        &mut self,
        device: &mut Device<'_, T, D, PWR>,
        wait: Duration,
    ) -> Option<Result<RemoteCommand, Error>>
    where
        T: Read + ReadReady + Write,
        D: StatusDisplay,
        PWR: OutputPin,
    {
        let result = device.next_message(wait)?.and_then(|message| {
            let command = RemoteCommand::parse(&message.text);
            info!("Received {:?} from {}", command, message.sender.as_str());
            self.handle(device, &command).map(|_| command)
        });

        if let Err(e) = device.delete_messages() {
            warn!("Failed to delete messages: {:?}", e);
        }
        Some(result)
    }

    pub fn handle<T, D, PWR>(
        &mut self,
        device: &mut Device<'_, T, D, PWR>,
        command: &RemoteCommand,
    ) -> Result<(), Error>
    where
        T: Read + ReadReady + Write,
        D: StatusDisplay,
        PWR: OutputPin,
    {
        match command {
            RemoteCommand::Led(times) => {
                self.led.blink(*times);
                Ok(())
            }
            RemoteCommand::Num(value) => {
                device.show(DisplayStatus::Value(*value));
                Ok(())
            }
            RemoteCommand::Temperature => {
                let centi = self.read_temperature()?;
                let text = celsius_text(centi);
                info!("Sending temperature {}", text.as_str());
                let response = device.send_short_message(self.settings.reply_to, &text);
                device.show(DisplayStatus::Temperature(centi));
                response.into_result().map(|_| ())
            }
            RemoteCommand::Get => {
                let path = self.settings.status_path;
                self.request(device, path, None, HttpVerb::Get)
            }
            RemoteCommand::Post => {
                let text = celsius_text(self.read_temperature()?);
                let path = self.settings.log_path;
                self.request(device, path, Some(text.as_str()), HttpVerb::Post)
            }
            RemoteCommand::Unknown(text) => {
                warn!("Unknown command: {}", text.as_str());
                Ok(())
            }
        }
    }

    fn read_temperature(&mut self) -> Result<i32, Error> {
        self.sensor.read_centi_celsius().map_err(|_| {
            error!("Temperature read failed");
            Error::Sensor
        })
    }

    /// Request `path` and show the `status` value of the returned JSON.
    fn request<T, D, PWR>(
        &mut self,
        device: &mut Device<'_, T, D, PWR>,
        path: &str,
        body: Option<&str>,
        verb: HttpVerb,
    ) -> Result<(), Error>
    where
        T: Read + ReadReady + Write,
        D: StatusDisplay,
        PWR: OutputPin,
    {
        let mut url: String<256> = String::new();
        write!(url, "{}{}", self.settings.server, path)?;

        let response = device.http_request(&url, body, verb)?;
        let json = response.json_body().ok_or_else(|| {
            warn!("No JSON data received");
            Error::Parse
        })?;
        let report = StatusReport::from_json(json)?;

        match DisplayStatus::decimal(report.status) {
            Some(status) => device.show(status),
            None => warn!("Status {} does not fit the display", report.status),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_helpers::{at_reply, MockPin, MockSensor, MockSerial, RecordingDisplay};

    fn processor(sensor: Option<i32>) -> CommandProcessor<'static, MockSensor, MockPin> {
        CommandProcessor::new(
            MockSensor(sensor),
            LedIndicator::new(MockPin::default()),
            RemoteSettings::new("https://example.com"),
        )
    }

    #[test]
    fn parse_commands() {
        assert_eq!(RemoteCommand::parse("LED=3"), RemoteCommand::Led(3));
        assert_eq!(RemoteCommand::parse("led=2\r"), RemoteCommand::Led(2));
        assert_eq!(RemoteCommand::parse("NUM=beef"), RemoteCommand::Num(0xBEEF));
        assert_eq!(RemoteCommand::parse("num=1234"), RemoteCommand::Num(0x1234));
        assert_eq!(RemoteCommand::parse("Tmp"), RemoteCommand::Temperature);
        assert_eq!(RemoteCommand::parse("get"), RemoteCommand::Get);
        assert_eq!(RemoteCommand::parse("POST"), RemoteCommand::Post);
        assert!(matches!(
            RemoteCommand::parse("NUM=zz"),
            RemoteCommand::Unknown(t) if t == "NUM=zz"
        ));
        assert!(matches!(RemoteCommand::parse("Zoë"), RemoteCommand::Unknown(_)));
    }

    #[test]
    fn status_report_json() {
        assert_eq!(
            StatusReport::from_json(b"{\"status\": 12}"),
            Ok(StatusReport { status: 12 })
        );
        assert_eq!(StatusReport::from_json(b"<html>"), Err(Error::Parse));
    }

    #[test]
    fn temperature_text() {
        assert_eq!(celsius_text(2340), "23.40");
        assert_eq!(celsius_text(-525), "-5.25");
        assert_eq!(celsius_text(7), "0.07");
    }

    #[test]
    fn num_shows_value() {
        let mut device =
            Device::new(MockSerial::new(), RecordingDisplay::default(), Config::default());
        processor(None)
            .handle(&mut device, &RemoteCommand::Num(0x42))
            .unwrap();
        assert_eq!(
            device.release().1.shown.last(),
            Some(&DisplayStatus::Value(0x42))
        );
    }

    #[test]
    fn temperature_is_texted_and_shown() {
        let serial = MockSerial::new()
            .reply("AT+CMGS=\"000\"", b"AT+CMGS=\"000\"\r\r\n> ".to_vec())
            .reply("23.40", at_reply("23.40", &["+CMGS: 1", "", "OK"]));
        let mut device = Device::new(serial, RecordingDisplay::default(), Config::default());

        processor(Some(2340))
            .handle(&mut device, &RemoteCommand::Temperature)
            .unwrap();

        let (serial, display) = device.release();
        assert!(serial.finished());
        assert_eq!(display.shown.last(), Some(&DisplayStatus::Temperature(2340)));
    }

    #[test]
    fn sensor_failure() {
        let mut device =
            Device::new(MockSerial::new(), RecordingDisplay::default(), Config::default());
        assert_eq!(
            processor(None).handle(&mut device, &RemoteCommand::Post),
            Err(Error::Sensor)
        );
    }

    #[test]
    fn poll_handles_and_deletes() {
        let serial = MockSerial::new()
            .unsolicited(b"\r\n+CMTI: \"SM\",1\r\n")
            .reply(
                "AT+CMGR=1",
                at_reply(
                    "AT+CMGR=1",
                    &["+CMGR: \"REC UNREAD\",\"000\",,\"21/03/01,12:00:00+00\"", "LED=1", "", "OK"],
                ),
            )
            .reply("AT+CMGD=,4", at_reply("AT+CMGD=,4", &["OK"]));
        let mut device = Device::new(serial, RecordingDisplay::default(), Config::default());
        let mut processor = processor(None);

        assert_eq!(
            processor.poll(&mut device, Duration::from_millis(100)),
            Some(Ok(RemoteCommand::Led(1)))
        );
        assert!(processor.led().is_lit());
        assert!(device.release().0.finished());
    }

    #[test]
    fn get_shows_status() {
        let serial = MockSerial::new()
            .reply(
                "AT+CNACT?",
                at_reply("AT+CNACT?", &["+CNACT: 0,1,\"10.64.1.2\"", "OK"]),
            )
            .reply("AT+SHSTATE?", at_reply("AT+SHSTATE?", &["+SHSTATE: 0", "OK"]))
            .reply(
                "AT+SHCONF=\"URL\",\"https://example.com\"",
                at_reply("AT+SHCONF=\"URL\",\"https://example.com\"", &["OK"]),
            )
            .reply("AT+SHCONN", at_reply("AT+SHCONN", &["OK"]))
            .reply(
                "AT+SHREQ=\"/api/v1/status\",1",
                at_reply(
                    "AT+SHREQ=\"/api/v1/status\",1",
                    &["OK", "", "+SHREQ: \"GET\",200,14"],
                ),
            )
            .reply(
                "AT+SHREAD=0,14",
                [
                    at_reply("AT+SHREAD=0,14", &["OK", "", "+SHREAD: 14"]),
                    b"{\"status\": 42}\r\n".to_vec(),
                ]
                .concat(),
            )
            .reply("AT+SHDISC", at_reply("AT+SHDISC", &["OK"]))
            .reply("AT+CNACT=0,0", at_reply("AT+CNACT=0,0", &["OK"]));
        let mut device = Device::new(serial, RecordingDisplay::default(), Config::default());
        device.headers_set = true;

        processor(None)
            .handle(&mut device, &RemoteCommand::Get)
            .unwrap();

        let (serial, display) = device.release();
        assert!(serial.finished());
        assert_eq!(display.shown.last(), Some(&DisplayStatus::Value(0x42)));
    }
}
