/// Where the modem is in its bring-up, as last observed by the [`crate::Device`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemState {
    /// Not yet powered up and configured
    #[default]
    Uninitialized,
    /// Polling the network for registration
    SearchingNetwork,
    /// Attached to an operator
    Registered,
    /// Bring-up or registration gave up
    Error,
}
