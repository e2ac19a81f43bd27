//! ### Network service

pub mod responses;

use super::Command;
use crate::error::Error;

/// Operator selection +COPS
///
/// The read command returns the current mode and, once the module is
/// registered, the operator name and access technology:
/// `+COPS: <mode>[,<format>,<oper>[,<AcT>]]`
pub fn get_operator_selection() -> Result<Command, Error> {
    Command::new("AT+COPS?")
}
