//! Argument and parameter types used by Packet Switched Network commands

/// State of a PDP context as reported by `+CNACT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContextStatus {
    Inactive = 0,
    Active = 1,
    /// The context is being (de)activated
    Operating = 2,
}

impl ContextStatus {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Self::Inactive),
            "1" => Some(Self::Active),
            "2" => Some(Self::Operating),
            _ => None,
        }
    }
}
