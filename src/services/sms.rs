use embassy_time::Duration;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::sms::{self, responses::Message};
use crate::command::{urc::Urc, Response};
use crate::display::{DisplayStatus, StatusDisplay};
use crate::error::Error;

impl<'a, T, D, PWR> Device<'a, T, D, PWR>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    /// Send `body` as a text message to `destination`. Not retried.
    pub fn send_short_message(&mut self, destination: &str, body: &str) -> Response {
        self.show(DisplayStatus::Sending);

        let response = self.transmit_message(destination, body);
        if response.is_success() {
            info!("Message sent to {}", destination);
            self.show(DisplayStatus::Sent);
        } else {
            let state = self.state();
            self.set_state(state);
        }
        response
    }

    fn transmit_message(&mut self, destination: &str, body: &str) -> Response {
        let (prompt, text) = match (sms::send(destination), sms::text(body, self.config.sms_timeout)) {
            (Ok(prompt), Ok(text)) => (prompt, text),
            (Err(e), _) | (_, Err(e)) => return e.into(),
        };

        match self.send(&prompt) {
            Response::Success(_) => self.send(&text),
            failed => failed,
        }
    }

    pub fn read_message(&mut self, index: u16) -> Result<Message, Error> {
        let cmd = sms::read(index, self.config.read_timeout)?;
        let payload = self.send(&cmd).into_result()?;
        Message::parse(&payload)
    }

    /// Empty the message storage.
    pub fn delete_messages(&mut self) -> Result<(), Error> {
        self.send(&sms::delete_all()?).into_result()?;
        Ok(())
    }

    /// Wait up to `wait` for a new message and read it. Other unsolicited
    /// result codes seen meanwhile are dropped.
    pub fn next_message(&mut self, wait: Duration) -> Option<Result<Message, Error>> {
        match self.channel.next_urc(wait)? {
            Urc::NewMessage { index } => {
                debug!("New message at index {}", index);
                Some(self.read_message(index))
            }
            other => {
                trace!("Ignoring {:?}", other);
                None
            }
        }
    }
}
