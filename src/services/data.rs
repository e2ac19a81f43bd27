use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::psn::{self, types::ContextStatus};
use crate::display::StatusDisplay;
use crate::error::Error;

/// PDP context carrying the HTTP(S) traffic.
pub const CONTEXT_ID: u8 = 0;

impl<'a, T, D, PWR> Device<'a, T, D, PWR>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    /// Activate the data context unless it is already up.
    pub fn open_data_connection(&mut self) -> Result<(), Error> {
        let payload = self.send(&psn::get_app_network_state()?).into_result()?;

        match psn::context_status(&payload, CONTEXT_ID)? {
            ContextStatus::Inactive => {
                let cmd = psn::activate(CONTEXT_ID, self.config.activation_timeout)?;
                self.send(&cmd).into_result()?;
                info!("Data connection active");
            }
            status => debug!("Data connection already up: {:?}", status),
        }
        Ok(())
    }

    pub fn close_data_connection(&mut self) -> Result<(), Error> {
        self.send(&psn::deactivate(CONTEXT_ID)?).into_result()?;
        info!("Data connection inactive");
        Ok(())
    }
}
