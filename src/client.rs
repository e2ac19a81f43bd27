use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::channel::AtChannel;
use crate::command::{general, http, Command, Response};
use crate::config::{Config, NoPin};
use crate::display::{DisplayStatus, StatusDisplay};
use crate::error::Error;
use crate::state::ModemState;

/// The modem, and the only owner of its serial channel, state and display.
pub struct Device<'a, T, D, PWR = NoPin> {
    pub(crate) channel: AtChannel<T>,
    pub(crate) config: Config<'a, PWR>,
    pub(crate) display: D,
    state: ModemState,
    pub(crate) headers_set: bool,
}

/// Bring the modem up: power it on if it does not answer, then apply the
/// module configuration. The returned device is not yet registered, see
/// [`Device::connect`].
pub fn init<'a, T, D, PWR>(
    transport: T,
    display: D,
    config: Config<'a, PWR>,
) -> Result<Device<'a, T, D, PWR>, Error>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    let mut device = Device::new(transport, display, config);
    device.boot()?;
    device.configure()?;
    Ok(device)
}

impl<'a, T, D, PWR> Device<'a, T, D, PWR>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    pub fn new(transport: T, mut display: D, config: Config<'a, PWR>) -> Self {
        display.show(DisplayStatus::Uninitialized);
        Self {
            channel: AtChannel::new(transport).with_command_timeout(config.command_timeout),
            config,
            display,
            state: ModemState::Uninitialized,
            headers_set: false,
        }
    }

    pub fn state(&self) -> ModemState {
        self.state
    }

    /// Record and render a state change.
    pub(crate) fn set_state(&mut self, state: ModemState) {
        if self.state != state {
            info!("Modem state {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        self.display.show(state.into());
    }

    /// Put something other than the modem state on the display. The next
    /// state change replaces it.
    pub fn show(&mut self, status: DisplayStatus) {
        self.display.show(status);
    }

    pub fn display(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn send(&mut self, cmd: &Command) -> Response {
        self.channel.send(cmd)
    }

    /// Module settings that survive until the next power cycle.
    pub fn configure(&mut self) -> Result<(), Error> {
        info!("Configuring modem");
        self.send(&general::configure(self.config.apn)?)
            .into_result()?;
        self.send(&http::configure_https()?).into_result()?;
        self.headers_set = false;
        Ok(())
    }

    /// Wait for network registration within the configured budget.
    pub fn connect(&mut self) -> Result<(), Error> {
        let attempts = self.config.registration_attempts;
        let interval = self.config.poll_interval;
        if self.await_network_registration(attempts, interval) {
            Ok(())
        } else {
            error!("No network after {} attempts", attempts);
            self.set_state(ModemState::Error);
            Err(Error::RegistrationFailed)
        }
    }

    /// Give back the transport and the display.
    pub fn release(self) -> (T, D) {
        (self.channel.release(), self.display)
    }
}
