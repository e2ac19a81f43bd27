use embassy_time::block_for;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::general;
use crate::display::StatusDisplay;
use crate::error::Error;
use crate::module_timing::pwr_on_time;
use crate::state::ModemState;

impl<'a, T, D, PWR> Device<'a, T, D, PWR>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    /// Pulse `PWRKEY`. Toggles the module on when off, and off when on.
    pub fn power_toggle(&mut self) -> Result<(), Error> {
        if let Some(pin) = self.config.pwr_pin.as_mut() {
            pin.set_high().map_err(|_| Error::IoPin)?;
            block_for(pwr_on_time());
            pin.set_low().map_err(|_| Error::IoPin)?;
            debug!("Power key toggled");
        } else {
            warn!("No power pin configured");
        }
        Ok(())
    }

    /// Probe the module with `ATE1`, which also makes sure echo is on.
    pub fn is_alive(&mut self) -> bool {
        match general::echo_on() {
            Ok(cmd) => self.send(&cmd).is_success(),
            Err(_) => false,
        }
    }

    /// Probe until the module answers, powering it up once if the first
    /// probe goes unanswered.
    pub fn boot(&mut self) -> Result<(), Error> {
        let attempts = self.config.boot_attempts;
        let mut toggled = false;

        for attempt in 1..=attempts {
            if self.is_alive() {
                info!("Modem ready");
                return Ok(());
            }

            if !toggled {
                info!("Powering modem");
                self.power_toggle()?;
                toggled = true;
            }

            if attempt < attempts {
                debug!("Modem not ready, attempt {}/{}", attempt, attempts);
                block_for(self.config.boot_interval);
            }
        }

        error!("Modem did not answer after {} attempts", attempts);
        self.set_state(ModemState::Error);
        Err(Error::PoweredDown)
    }
}
