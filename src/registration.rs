use embassy_time::{block_for, Duration};
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::network_service::{self, responses::OperatorSelection};
use crate::display::StatusDisplay;
use crate::error::Error;
use crate::state::ModemState;

impl<'a, T, D, PWR> Device<'a, T, D, PWR>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    /// One `AT+COPS?` poll. A timeout or error counts as not registered.
    pub fn check_network(&mut self) -> Result<OperatorSelection, Error> {
        let payload = self
            .send(&network_service::get_operator_selection()?)
            .into_result()?;
        OperatorSelection::parse(&payload)
    }

    /// Poll for an operator up to `max_attempts` times, `poll_interval`
    /// apart. Returns as soon as one is reported; no sleep follows the last
    /// attempt.
    pub fn await_network_registration(&mut self, max_attempts: u32, poll_interval: Duration) -> bool {
        for attempt in 1..=max_attempts {
            self.set_state(ModemState::SearchingNetwork);

            match self.check_network() {
                Ok(selection) if selection.is_registered() => {
                    info!(
                        "Registered on {:?} after {} attempt(s)",
                        selection.operator.as_deref(),
                        attempt
                    );
                    self.set_state(ModemState::Registered);
                    return true;
                }
                Ok(_) => debug!("Not registered yet, attempt {}/{}", attempt, max_attempts),
                Err(e) => warn!("Registration check failed: {:?}", e),
            }

            if attempt < max_attempts {
                block_for(poll_interval);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::display::DisplayStatus;
    use crate::state::ModemState;
    use crate::test_helpers::{at_reply, MockSerial, RecordingDisplay};
    use crate::Device;
    use embassy_time::{Duration, Instant};

    fn searching() -> std::vec::Vec<u8> {
        at_reply("AT+COPS?", &["+COPS: 0", "OK"])
    }

    fn registered() -> std::vec::Vec<u8> {
        at_reply("AT+COPS?", &["+COPS: 0,0,\"Twilio Super SIM\",7", "OK"])
    }

    #[test]
    fn registers_on_third_attempt() {
        let serial = MockSerial::new()
            .reply("AT+COPS?", searching())
            .reply("AT+COPS?", searching())
            .reply("AT+COPS?", registered());
        let mut device = Device::new(serial, RecordingDisplay::default(), Config::default());

        let start = Instant::now();
        assert!(device.await_network_registration(3, Duration::from_millis(1000)));
        assert!(start.elapsed() >= Duration::from_millis(2000));
        assert_eq!(device.state(), ModemState::Registered);

        let (serial, display) = device.release();
        assert_eq!(serial.written().len(), 3);
        assert_eq!(
            display.shown,
            [
                DisplayStatus::Uninitialized,
                DisplayStatus::SearchingNetwork,
                DisplayStatus::SearchingNetwork,
                DisplayStatus::SearchingNetwork,
                DisplayStatus::Registered,
            ]
        );
    }

    #[test]
    fn exhausted_budget_issues_exactly_max_attempts() {
        let serial = MockSerial::new()
            .reply("AT+COPS?", searching())
            .reply("AT+COPS?", at_reply("AT+COPS?", &["ERROR"]))
            .reply("AT+COPS?", searching())
            .reply("AT+COPS?", searching());
        let mut device = Device::new(serial, RecordingDisplay::default(), Config::default());

        assert!(!device.await_network_registration(4, Duration::from_millis(5)));
        assert_eq!(device.state(), ModemState::SearchingNetwork);

        let (serial, _) = device.release();
        assert_eq!(serial.written().len(), 4);
        assert!(serial.finished());
    }

    #[test]
    fn timeouts_count_as_attempts() {
        let serial = MockSerial::new()
            .silent("AT+COPS?")
            .reply("AT+COPS?", registered());
        let config = Config::default().command_timeout(Duration::from_millis(50));
        let mut device = Device::new(serial, RecordingDisplay::default(), config);

        assert!(device.await_network_registration(2, Duration::from_millis(5)));
    }

    #[test]
    fn zero_attempts() {
        let mut device = Device::new(MockSerial::new(), RecordingDisplay::default(), Config::default());
        assert!(!device.await_network_registration(0, Duration::from_millis(1000)));
        let (serial, _) = device.release();
        assert!(serial.written().is_empty());
    }
}
