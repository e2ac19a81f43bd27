#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod client;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
mod module_timing;
mod power;
mod registration;
pub mod remote;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_helpers;

pub use client::{init, Device};
pub use config::Config;
pub use error::Error;
pub use state::ModemState;
