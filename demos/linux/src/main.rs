//! Brings a SIM7080G up from a linux host, sends a greeting and then acts on
//! text message commands.
//!
//! `cargo run -- /dev/ttyUSB0 https://<your-server>`

mod serial;

use std::convert::Infallible;
use std::time::Duration as StdDuration;

use embassy_time::Duration;
use log::{error, info, warn};
use pico_cellular::config::NoPin;
use pico_cellular::display::{LedIndicator, SegmentDisplay, SegmentDriver};
use pico_cellular::remote::{CommandProcessor, RemoteSettings, TemperatureSensor};
use pico_cellular::Config;

use serial::Serial;

/// Factory default of the SIM7080G UART.
const BAUD_RATE: u32 = 115_200;

/// Prints what a segment display would show.
struct LogDriver;

impl SegmentDriver for LogDriver {
    type Error = Infallible;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        info!("[{:^5}]", text);
        Ok(())
    }
}

/// The host has no sensor attached.
struct FixedSensor(i32);

impl TemperatureSensor for FixedSensor {
    type Error = Infallible;

    fn read_centi_celsius(&mut self) -> Result<i32, Self::Error> {
        Ok(self.0)
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let port_name = args.next().unwrap_or_else(|| "/dev/ttyUSB0".into());
    let server = args.next().unwrap_or_else(|| "https://example.free.beeceptor.com".into());

    let config = Config::new("super");
    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(StdDuration::from_millis(10))
        .open()
        .expect("Could not open serial port");

    let display = SegmentDisplay::new(LogDriver);
    let mut device = match pico_cellular::init(Serial(port), display, config) {
        Ok(device) => device,
        Err(e) => {
            error!("Modem bring-up failed: {:?}", e);
            return;
        }
    };

    if let Err(e) = device.connect() {
        error!("{:?}", e);
        return;
    }

    let response = device.send_short_message("000", "Hello from Rust");
    info!("Greeting: {:?}", response);

    let mut processor = CommandProcessor::new(
        FixedSensor(2150),
        LedIndicator::new(NoPin),
        RemoteSettings::new(&server),
    );

    info!("Listening for commands...");
    loop {
        match processor.poll(&mut device, Duration::from_secs(5)) {
            Some(Ok(command)) => info!("Done: {:?}", command),
            Some(Err(e)) => warn!("Command failed: {:?}", e),
            None => {}
        }
    }
}
