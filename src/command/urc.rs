//! Unsolicited result codes

use super::field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// `+CMTI: "SM",<index>`, a message was stored
    NewMessage { index: u16 },
    /// `+APP PDP: <cid>,ACTIVE|DEACTIVE`
    PdpState { cid: u8, active: bool },
    /// `+SHREQ: "<type>",<status>,<length>`, a request completed
    HttpResponse { status: u16, length: usize },
    /// `SMS Ready`
    SmsReady,
    /// `RDY`, the module finished booting
    Ready,
}

impl Urc {
    pub fn parse(line: &str) -> Option<Self> {
        if line == "RDY" {
            return Some(Self::Ready);
        }
        if line == "SMS Ready" {
            return Some(Self::SmsReady);
        }
        if line.starts_with("+CMTI:") {
            let index = field(line, 1)?.parse().ok()?;
            return Some(Self::NewMessage { index });
        }
        if line.starts_with("+APP PDP:") {
            let cid = field(line, 0)?.parse().ok()?;
            let active = match field(line, 1)? {
                "ACTIVE" => true,
                "DEACTIVE" => false,
                _ => return None,
            };
            return Some(Self::PdpState { cid, active });
        }
        if line.starts_with("+SHREQ:") {
            let status = field(line, 1)?.parse().ok()?;
            let length = field(line, 2)?.parse().ok()?;
            return Some(Self::HttpResponse { status, length });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_urcs() {
        assert_eq!(
            Urc::parse("+CMTI: \"SM\",3"),
            Some(Urc::NewMessage { index: 3 })
        );
        assert_eq!(
            Urc::parse("+APP PDP: 0,ACTIVE"),
            Some(Urc::PdpState {
                cid: 0,
                active: true
            })
        );
        assert_eq!(
            Urc::parse("+APP PDP: 0,DEACTIVE"),
            Some(Urc::PdpState {
                cid: 0,
                active: false
            })
        );
        assert_eq!(
            Urc::parse("+SHREQ: \"GET\",200,15"),
            Some(Urc::HttpResponse {
                status: 200,
                length: 15
            })
        );
        assert_eq!(Urc::parse("RDY"), Some(Urc::Ready));
        assert_eq!(Urc::parse("+COPS: 0"), None);
        assert_eq!(Urc::parse("+CMTI: \"SM\""), None);
    }
}
