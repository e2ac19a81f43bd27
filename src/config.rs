use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::module_timing::{
    activation_time, boot_time, command_time, http_time, read_time, registration_poll_time,
    sms_send_time, BOOT_ATTEMPTS, REGISTRATION_ATTEMPTS,
};

/// Stand-in for a power key line that is not wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Board and timing configuration of a [`crate::Device`].
///
/// Every value defaults to what a Pico with the Waveshare SIM7080G board and
/// a Super SIM needs; only the APN is mandatory.
#[derive(Debug)]
pub struct Config<'a, PWR = NoPin> {
    pub(crate) pwr_pin: Option<PWR>,
    pub(crate) apn: &'a str,
    pub(crate) command_timeout: Duration,
    pub(crate) boot_attempts: u8,
    pub(crate) boot_interval: Duration,
    pub(crate) registration_attempts: u32,
    pub(crate) poll_interval: Duration,
    pub(crate) activation_timeout: Duration,
    pub(crate) sms_timeout: Duration,
    pub(crate) http_timeout: Duration,
    pub(crate) read_timeout: Duration,
}

impl Default for Config<'static, NoPin> {
    fn default() -> Self {
        Self::new("super")
    }
}

impl<'a> Config<'a, NoPin> {
    #[must_use]
    pub fn new(apn: &'a str) -> Self {
        Self {
            pwr_pin: None,
            apn,
            command_timeout: command_time(),
            boot_attempts: BOOT_ATTEMPTS,
            boot_interval: boot_time(),
            registration_attempts: REGISTRATION_ATTEMPTS,
            poll_interval: registration_poll_time(),
            activation_timeout: activation_time(),
            sms_timeout: sms_send_time(),
            http_timeout: http_time(),
            read_timeout: read_time(),
        }
    }
}

impl<'a, PWR> Config<'a, PWR>
where
    PWR: OutputPin,
{
    /// The modem's `PWRKEY` line, pulsed high when the module does not answer.
    pub fn with_pwr<P: OutputPin>(self, pwr_pin: P) -> Config<'a, P> {
        Config {
            pwr_pin: Some(pwr_pin),
            apn: self.apn,
            command_timeout: self.command_timeout,
            boot_attempts: self.boot_attempts,
            boot_interval: self.boot_interval,
            registration_attempts: self.registration_attempts,
            poll_interval: self.poll_interval,
            activation_timeout: self.activation_timeout,
            sms_timeout: self.sms_timeout,
            http_timeout: self.http_timeout,
            read_timeout: self.read_timeout,
        }
    }

    #[must_use]
    pub fn command_timeout(self, command_timeout: Duration) -> Self {
        Self {
            command_timeout,
            ..self
        }
    }

    #[must_use]
    pub fn boot_attempts(self, boot_attempts: u8, boot_interval: Duration) -> Self {
        Self {
            boot_attempts,
            boot_interval,
            ..self
        }
    }

    #[must_use]
    pub fn registration(self, registration_attempts: u32, poll_interval: Duration) -> Self {
        Self {
            registration_attempts,
            poll_interval,
            ..self
        }
    }

    #[must_use]
    pub fn activation_timeout(self, activation_timeout: Duration) -> Self {
        Self {
            activation_timeout,
            ..self
        }
    }

    #[must_use]
    pub fn sms_timeout(self, sms_timeout: Duration) -> Self {
        Self {
            sms_timeout,
            ..self
        }
    }

    #[must_use]
    pub fn http_timeout(self, http_timeout: Duration) -> Self {
        Self {
            http_timeout,
            ..self
        }
    }

    #[must_use]
    pub fn read_timeout(self, read_timeout: Duration) -> Self {
        Self {
            read_timeout,
            ..self
        }
    }

    pub fn apn(&self) -> &'a str {
        self.apn
    }
}
