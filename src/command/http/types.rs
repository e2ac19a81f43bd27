//! Argument and parameter types used by HTTP(S) commands

/// Request method of `AT+SHREQ`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpVerb {
    Get = 1,
    Put = 2,
    Post = 3,
    Patch = 4,
    Head = 5,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
        }
    }
}
