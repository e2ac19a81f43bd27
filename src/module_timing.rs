use embassy_time::Duration;

/// High time of the `PWRKEY` line to toggle the SIM7080G on or off
pub fn pwr_on_time() -> Duration {
    Duration::from_millis(1500)
}

/// Wait between `ATE1` probes while the module boots
pub fn boot_time() -> Duration {
    Duration::from_secs(4)
}

/// Number of `ATE1` probes before giving up on the module
pub const BOOT_ATTEMPTS: u8 = 20;

/// Default response time of a plain command
pub fn command_time() -> Duration {
    Duration::from_millis(1000)
}

/// Time for `+APP PDP: 0,ACTIVE` to follow `AT+CNACT=0,1`
pub fn activation_time() -> Duration {
    Duration::from_millis(2000)
}

/// Time for `AT+CMGR` and `AT+SHREAD` to deliver their data
pub fn read_time() -> Duration {
    Duration::from_millis(2000)
}

/// Time for `+CMGS:` to follow the message text
pub fn sms_send_time() -> Duration {
    Duration::from_secs(10)
}

/// Upper bound for `AT+SHCONN` and for `+SHREQ:` to follow `AT+SHREQ`
pub fn http_time() -> Duration {
    Duration::from_secs(90)
}

/// Gap between `AT+COPS?` polls while searching for a network
pub fn registration_poll_time() -> Duration {
    Duration::from_millis(1000)
}

/// Number of `AT+COPS?` polls before registration is considered failed
pub const REGISTRATION_ATTEMPTS: u32 = 60;
